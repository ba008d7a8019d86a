//! Object model: values, member tables, types and execution contexts.

pub mod class;
pub mod env;
pub mod members;
pub mod value;

pub use class::TypeDescriptor;
pub use env::{ContextStack, ExecutionContext};
pub use members::{MemberTable, SharedMembers};
pub use value::{
    BoundMethod, DictKey, Function, Instance, IterState, Module, Namespace, NativeFn,
    NativeMethod, NativeObject, NativeType, NativeTypeKind, RangeValue, Value,
};

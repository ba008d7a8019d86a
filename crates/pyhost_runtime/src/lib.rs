//! pyhost runtime: the object model and import system of a Python-like
//! language hosted on a native type system.
//!
//! The runtime never parses source text. A [`Frontend`] turns a source module
//! into a [`Program`], a closure that drives the runtime through its public
//! operations (`get_attr`, `call`, `import`, `define_class`, ...).

#![allow(clippy::new_without_default)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::len_without_is_empty)]
#![allow(clippy::manual_hash_one)]
#![allow(clippy::borrowed_box)]

pub mod core;
pub mod errors;
mod object;
mod native;
mod methods;
mod modules;
mod runtime;
mod builtins;
pub mod builtins_registry;

pub use self::core::{
    BoundMethod, DictKey, Function, Instance, MemberTable, Module, Namespace, NativeObject,
    NativeType, NativeTypeKind, SharedMembers, TypeDescriptor, Value,
};
pub use errors::RuntimeError;

pub use methods::MethodKind;
pub use modules::{
    Frontend, ImportStamp, LoadedModule, ModuleKind, ModuleLoader, Program, ResolvedModule,
    SearchTier, Selective, StdModuleLoader, candidates,
};
pub use native::{
    ExtensionRegistry, ManifestHost, NamespaceSnapshot, NamespaceTree, NativeHost, NativeModule,
    json_to_value, normalize_path, parse_manifest,
};

pub use builtins_registry::{BuiltinProvider, BuiltinRegistry, StdBuiltinProvider};

pub use runtime::{ExecResult, MAIN_CONTEXT, Runtime, RuntimeConfig};

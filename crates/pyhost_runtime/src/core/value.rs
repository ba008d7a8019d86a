//! Runtime values.
//!
//! Language-level entities (types, instances, modules, namespaces) each own
//! an explicit [`MemberTable`]. Host values (the built-in scalars and
//! containers, plus [`NativeObject`]s) have no member table; their attributes
//! come from intrinsic members and the extension registry.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

use pyhost_core::{FastIndexMap, FastIndexSet, HostTypeId, NativeTypeInfo};

use super::class::TypeDescriptor;
use super::members::{MemberTable, SharedMembers};
use crate::errors::RuntimeError;
use crate::methods::MethodKind;
use crate::runtime::Runtime;

pub type NativeFn = Rc<dyn Fn(&mut Runtime, &[Value]) -> Result<Value, RuntimeError>>;

pub type ListRef = Rc<RefCell<Vec<Value>>>;
pub type DictRef = Rc<RefCell<FastIndexMap<DictKey, Value>>>;
pub type SetRef = Rc<RefCell<FastIndexSet<DictKey>>>;

#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    List(ListRef),
    Tuple(Rc<[Value]>),
    Dict(DictRef),
    Set(SetRef),
    Range(Rc<RangeValue>),
    Iterator(Rc<RefCell<IterState>>),
    Function(Rc<Function>),
    BoundMethod(Rc<BoundMethod>),
    Type(Rc<TypeDescriptor>),
    Instance(Rc<Instance>),
    Module(Rc<Module>),
    Namespace(Rc<Namespace>),
    NativeType(Rc<NativeType>),
    NativeObject(Rc<NativeObject>),
    NativeMethod(Rc<NativeMethod>),
}

impl Value {
    pub fn str(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Rc::from(items))
    }

    pub fn dict(map: FastIndexMap<DictKey, Value>) -> Self {
        Value::Dict(Rc::new(RefCell::new(map)))
    }

    pub fn set(set: FastIndexSet<DictKey>) -> Self {
        Value::Set(Rc::new(RefCell::new(set)))
    }

    pub fn function(f: Function) -> Self {
        Value::Function(Rc::new(f))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::Bool(b) => Some(*b as i64 as f64),
            _ => None,
        }
    }

    /// Name used in messages: the class name for instances, the host type's
    /// simple name otherwise.
    pub fn type_name(&self) -> String {
        match self {
            Value::None => "NoneType".into(),
            Value::Bool(_) => "bool".into(),
            Value::Int(_) => "int".into(),
            Value::Float(_) => "float".into(),
            Value::Str(_) => "str".into(),
            Value::List(_) => "list".into(),
            Value::Tuple(_) => "tuple".into(),
            Value::Dict(_) => "dict".into(),
            Value::Set(_) => "set".into(),
            Value::Range(_) => "range".into(),
            Value::Iterator(_) => "iterator".into(),
            Value::Function(_) => "function".into(),
            Value::BoundMethod(_) => "method".into(),
            Value::NativeMethod(_) => "builtin_method".into(),
            Value::Type(_) => "type".into(),
            Value::Instance(i) => i.type_name(),
            Value::Module(_) => "module".into(),
            Value::Namespace(_) => "Namespace".into(),
            Value::NativeType(_) => "type".into(),
            Value::NativeObject(o) => o.ty.name.clone(),
        }
    }

    /// Object identity. Scalars compare by value.
    pub fn is(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Dict(a), Value::Dict(b)) => Rc::ptr_eq(a, b),
            (Value::Set(a), Value::Set(b)) => Rc::ptr_eq(a, b),
            (Value::Tuple(a), Value::Tuple(b)) => Rc::ptr_eq(a, b),
            (Value::Str(a), Value::Str(b)) => Rc::ptr_eq(a, b) || a == b,
            (Value::BoundMethod(a), Value::BoundMethod(b)) => Rc::ptr_eq(a, b),
            _ => self == other,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Set(a), Value::Set(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Range(a), Value::Range(b)) => a == b,
            (Value::Iterator(a), Value::Iterator(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::BoundMethod(a), Value::BoundMethod(b)) => {
                Rc::ptr_eq(&a.function, &b.function) && a.receiver.is(&b.receiver)
            }
            (Value::Type(a), Value::Type(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            (Value::Module(a), Value::Module(b)) => Rc::ptr_eq(a, b),
            (Value::Namespace(a), Value::Namespace(b)) => Rc::ptr_eq(a, b),
            (Value::NativeType(a), Value::NativeType(b)) => Rc::ptr_eq(a, b) || a.id == b.id,
            (Value::NativeObject(a), Value::NativeObject(b)) => Rc::ptr_eq(a, b),
            (Value::NativeMethod(a), Value::NativeMethod(b)) => {
                a.kind == b.kind && a.receiver.is(&b.receiver)
            }
            _ => false,
        }
    }
}

thread_local! {
    /// Lists currently being debug-formatted, so a list that contains itself
    /// prints `[...]`.
    static DEBUG_LISTS: RefCell<Vec<*const ()>> = const { RefCell::new(Vec::new()) };
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(l) => {
                let ptr = Rc::as_ptr(l) as *const ();
                if DEBUG_LISTS.with(|open| open.borrow().contains(&ptr)) {
                    return f.write_str("[...]");
                }
                DEBUG_LISTS.with(|open| open.borrow_mut().push(ptr));
                let result = f.debug_list().entries(l.borrow().iter()).finish();
                DEBUG_LISTS.with(|open| open.borrow_mut().pop());
                result
            }
            Value::Tuple(t) => f.debug_list().entries(t.iter()).finish(),
            Value::Type(t) => write!(f, "<class {}>", t.name),
            Value::Instance(i) => write!(f, "<{} object>", i.type_name()),
            Value::Function(func) => write!(f, "<function {}>", func.name),
            Value::NativeType(t) => write!(f, "<native {}>", t.id),
            other => write!(f, "<{}>", other.type_name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

/// Hashable projection of a value, used for dict keys and set members.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DictKey {
    None,
    Bool(bool),
    Int(i64),
    Str(Rc<str>),
    Tuple(Rc<[DictKey]>),
}

impl DictKey {
    pub fn from_value(v: &Value) -> Option<DictKey> {
        Some(match v {
            Value::None => DictKey::None,
            Value::Bool(b) => DictKey::Bool(*b),
            Value::Int(i) => DictKey::Int(*i),
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => DictKey::Int(*f as i64),
            Value::Str(s) => DictKey::Str(s.clone()),
            Value::Tuple(items) => {
                let keys = items
                    .iter()
                    .map(DictKey::from_value)
                    .collect::<Option<Vec<_>>>()?;
                DictKey::Tuple(Rc::from(keys))
            }
            _ => return None,
        })
    }

    pub fn to_value(&self) -> Value {
        match self {
            DictKey::None => Value::None,
            DictKey::Bool(b) => Value::Bool(*b),
            DictKey::Int(i) => Value::Int(*i),
            DictKey::Str(s) => Value::Str(s.clone()),
            DictKey::Tuple(items) => Value::tuple(items.iter().map(DictKey::to_value).collect()),
        }
    }
}

/// A callable implemented in Rust, or compiled by a frontend into a closure.
pub struct Function {
    pub name: String,
    pub handler: NativeFn,
    is_static: Cell<bool>,
}

impl Function {
    pub fn new(name: &str, handler: NativeFn) -> Self {
        Self {
            name: name.to_string(),
            handler,
            is_static: Cell::new(false),
        }
    }

    pub fn from_fn<F>(name: &str, f: F) -> Self
    where
        F: Fn(&mut Runtime, &[Value]) -> Result<Value, RuntimeError> + 'static,
    {
        Self::new(name, Rc::new(f))
    }

    pub fn is_static(&self) -> bool {
        self.is_static.get()
    }

    pub fn mark_static(&self) {
        self.is_static.set(true);
    }
}

/// A function paired with the receiver it was looked up on.
pub struct BoundMethod {
    pub receiver: Value,
    pub function: Rc<Function>,
}

pub struct Instance {
    ty: RefCell<Rc<TypeDescriptor>>,
    pub members: SharedMembers,
}

impl Instance {
    pub fn new(ty: Rc<TypeDescriptor>) -> Self {
        let members = MemberTable::shared();
        members
            .borrow_mut()
            .insert("__class__", Value::Type(ty.clone()));
        Self {
            ty: RefCell::new(ty),
            members,
        }
    }

    /// Instance viewing `members` through `ty`; used by `super()`.
    pub fn with_members(ty: Rc<TypeDescriptor>, members: SharedMembers) -> Self {
        Self {
            ty: RefCell::new(ty),
            members,
        }
    }

    pub fn ty(&self) -> Rc<TypeDescriptor> {
        self.ty.borrow().clone()
    }

    pub fn set_ty(&self, ty: Rc<TypeDescriptor>) {
        *self.ty.borrow_mut() = ty;
    }

    pub fn type_name(&self) -> String {
        self.ty.borrow().name.clone()
    }

    pub fn get_own(&self, name: &str) -> Option<Value> {
        self.members.borrow().get(name).cloned()
    }
}

/// An executed source module.
pub struct Module {
    pub name: String,
    pub path: PathBuf,
    pub globals: SharedMembers,
}

/// One path segment of a native library namespace.
pub struct Namespace {
    pub path: String,
    pub members: SharedMembers,
}

impl Namespace {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            members: MemberTable::shared(),
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.members.borrow().get(name).cloned()
    }
}

#[derive(Clone, Debug)]
pub enum NativeTypeKind {
    /// Backs a built-in value kind (`int`, `str`, `list`, ...).
    Builtin,
    /// Placeholder bound in a namespace tree for a declared host type.
    Declared,
    /// `Generic[T1, ..., Tn]`.
    Instantiated {
        generic: Rc<NativeTypeInfo>,
        args: Vec<Value>,
    },
    /// `T[()]`.
    Array { element: Rc<NativeType> },
}

/// A host type as seen by scripts.
#[derive(Debug)]
pub struct NativeType {
    pub id: HostTypeId,
    /// Demangled simple name.
    pub name: String,
    /// Demangled, namespace-qualified name.
    pub path: String,
    pub kind: NativeTypeKind,
    info: RefCell<Option<Rc<NativeTypeInfo>>>,
    generics: RefCell<BTreeMap<usize, Rc<NativeTypeInfo>>>,
}

impl NativeType {
    pub fn new(id: HostTypeId, name: &str, path: &str, kind: NativeTypeKind) -> Self {
        Self {
            id,
            name: name.to_string(),
            path: path.to_string(),
            kind,
            info: RefCell::new(None),
            generics: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn builtin(id: &str, name: &str) -> Self {
        Self::new(HostTypeId::new(id), name, name, NativeTypeKind::Builtin)
    }

    pub fn info(&self) -> Option<Rc<NativeTypeInfo>> {
        self.info.borrow().clone()
    }

    pub(crate) fn set_info_if_absent(&self, info: &Rc<NativeTypeInfo>) {
        let mut slot = self.info.borrow_mut();
        if slot.is_none() {
            *slot = Some(info.clone());
        }
    }

    pub fn generic(&self, arity: usize) -> Option<Rc<NativeTypeInfo>> {
        self.generics.borrow().get(&arity).cloned()
    }

    /// Registers the arity's underlying type; the first registration stays.
    pub(crate) fn register_generic(&self, arity: usize, info: &Rc<NativeTypeInfo>) {
        self.generics
            .borrow_mut()
            .entry(arity)
            .or_insert_with(|| info.clone());
    }

    pub fn arities(&self) -> Vec<usize> {
        self.generics.borrow().keys().copied().collect()
    }
}

/// Instance of a constructible host type.
pub struct NativeObject {
    pub ty: Rc<NativeType>,
    pub fields: RefCell<MemberTable>,
}

/// An intrinsic method of a host value, bound to its receiver.
pub struct NativeMethod {
    pub receiver: Value,
    pub kind: MethodKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeValue {
    pub start: i64,
    pub end: i64,
    pub step: i64,
}

impl RangeValue {
    /// Element count, computed in `i128` so bounds at the ends of `i64`
    /// cannot overflow.
    pub fn len(&self) -> usize {
        let (start, end, step) = (self.start as i128, self.end as i128, self.step as i128);
        let span = if step > 0 { end - start } else { start - end };
        if span <= 0 || step == 0 {
            return 0;
        }
        let step = step.abs();
        usize::try_from((span + step - 1) / step).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Negative indices count from the end.
    pub fn get(&self, index: i64) -> Option<i64> {
        let len = self.len() as i128;
        let index = index as i128;
        let i = if index < 0 { index + len } else { index };
        if i < 0 || i >= len {
            return None;
        }
        i64::try_from(self.start as i128 + i * self.step as i128).ok()
    }

    pub fn contains(&self, n: i64) -> bool {
        let in_bounds = if self.step > 0 {
            n >= self.start && n < self.end
        } else {
            n <= self.start && n > self.end
        };
        in_bounds && (n as i128 - self.start as i128) % self.step as i128 == 0
    }
}

pub enum IterState {
    Seq { items: Vec<Value>, pos: usize },
    /// `next` is `None` once stepping past it would leave `i64`.
    Range { next: Option<i64>, end: i64, step: i64 },
    /// An instance implementing `__next__`.
    Protocol(Value),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_len_and_negative_index() {
        let r = RangeValue {
            start: 0,
            end: 10,
            step: 3,
        };
        assert_eq!(r.len(), 4);
        assert_eq!(r.get(-1), Some(9));
        assert_eq!(r.get(4), None);

        let down = RangeValue {
            start: 5,
            end: 0,
            step: -2,
        };
        assert_eq!(down.len(), 3);
        assert_eq!(down.get(-1), Some(1));
        assert_eq!(down.get(0), Some(5));
    }

    #[test]
    fn range_at_i64_bounds_does_not_overflow() {
        let full = RangeValue {
            start: i64::MIN,
            end: i64::MAX,
            step: 1,
        };
        assert_eq!(full.len() as u128, u64::MAX as u128);
        assert_eq!(full.get(-1), Some(i64::MAX - 1));
        assert!(full.contains(i64::MIN));
        assert!(!full.contains(i64::MAX));

        let evens = RangeValue {
            start: 0,
            end: i64::MAX,
            step: 2,
        };
        assert_eq!(evens.get(-1), Some(i64::MAX - 1));

        let down = RangeValue {
            start: i64::MAX,
            end: i64::MIN,
            step: -1,
        };
        assert!(down.contains(i64::MIN + 1));
        assert!(!down.contains(i64::MIN));
        assert_eq!(down.get(0), Some(i64::MAX));
    }

    #[test]
    fn debug_of_self_containing_list_terminates() {
        let list = Value::list(vec![Value::Int(1)]);
        if let Value::List(l) = &list {
            l.borrow_mut().push(list.clone());
        }
        assert_eq!(format!("{list:?}"), "[1, [...]]");
    }

    #[test]
    fn native_type_kinds_are_debug_printable() {
        let element = Rc::new(NativeType::new(
            HostTypeId::new("Geo.Point"),
            "Point",
            "Geo.Point",
            NativeTypeKind::Declared,
        ));
        let kind = NativeTypeKind::Array { element };
        assert!(format!("{kind:?}").contains("HostTypeId(Geo.Point)"));
    }

    #[test]
    fn dict_keys_reject_mutable_containers() {
        assert!(DictKey::from_value(&Value::list(vec![])).is_none());
        let t = Value::tuple(vec![Value::Int(1), Value::str("a")]);
        let k = DictKey::from_value(&t).unwrap();
        assert_eq!(k.to_value(), t);
    }

    #[test]
    fn int_and_float_compare_numerically() {
        assert_eq!(Value::Int(2), Value::Float(2.0));
        assert_ne!(Value::Int(2), Value::str("2"));
    }
}

//! Intrinsic methods of the built-in host values.

use crate::core::Value;
use crate::errors::RuntimeError;
use crate::runtime::Runtime;

mod common;
mod dict;
mod list;
mod set;
mod str;
mod tuple;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Push,
    Pop,
    Insert,
    Extend,
    Reverse,
    Sort,
    Index,
    Count,
    Contains,
    Clear,
    Remove,
    Upper,
    Lower,
    Strip,
    StartsWith,
    EndsWith,
    Find,
    Keys,
    Values,
    Items,
    Get,
    Update,
    Add,
    Discard,
    Unknown,
}

impl Default for MethodKind {
    fn default() -> Self {
        Self::Unknown
    }
}

impl MethodKind {
    pub(crate) fn from_str(s: &str) -> Self {
        match s {
            "push" => Self::Push,
            "pop" => Self::Pop,
            "insert" => Self::Insert,
            "extend" => Self::Extend,
            "reverse" => Self::Reverse,
            "sort" => Self::Sort,
            "index" => Self::Index,
            "count" => Self::Count,
            "contains" => Self::Contains,
            "clear" => Self::Clear,
            "remove" => Self::Remove,
            "upper" => Self::Upper,
            "lower" => Self::Lower,
            "strip" => Self::Strip,
            "startswith" => Self::StartsWith,
            "endswith" => Self::EndsWith,
            "find" => Self::Find,
            "keys" => Self::Keys,
            "values" => Self::Values,
            "items" => Self::Items,
            "get" => Self::Get,
            "update" => Self::Update,
            "add" => Self::Add,
            "discard" => Self::Discard,
            _ => Self::Unknown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Pop => "pop",
            Self::Insert => "insert",
            Self::Extend => "extend",
            Self::Reverse => "reverse",
            Self::Sort => "sort",
            Self::Index => "index",
            Self::Count => "count",
            Self::Contains => "contains",
            Self::Clear => "clear",
            Self::Remove => "remove",
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Strip => "strip",
            Self::StartsWith => "startswith",
            Self::EndsWith => "endswith",
            Self::Find => "find",
            Self::Keys => "keys",
            Self::Values => "values",
            Self::Items => "items",
            Self::Get => "get",
            Self::Update => "update",
            Self::Add => "add",
            Self::Discard => "discard",
            Self::Unknown => "<unknown>",
        }
    }

    /// The intrinsic method `name` of `recv`, if its kind has one.
    pub(crate) fn lookup(recv: &Value, name: &str) -> Option<Self> {
        let kind = Self::from_str(name);
        let supported = match recv {
            Value::List(_) => list::supports(kind),
            Value::Tuple(_) => tuple::supports(kind),
            Value::Str(_) => str::supports(kind),
            Value::Dict(_) => dict::supports(kind),
            Value::Set(_) => set::supports(kind),
            _ => false,
        };
        supported.then_some(kind)
    }
}

pub(crate) fn dispatch_builtin_method(
    rt: &mut Runtime,
    recv: &Value,
    kind: MethodKind,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    match recv {
        Value::List(l) => list::dispatch(rt, l, kind, args),
        Value::Tuple(t) => tuple::dispatch(rt, t, kind, args),
        Value::Str(s) => str::dispatch(rt, s, kind, args),
        Value::Dict(d) => dict::dispatch(rt, d, kind, args),
        Value::Set(s) => set::dispatch(rt, s, kind, args),
        _ => Err(common::unsupported(rt, recv, kind)),
    }
}

//! Native library type metadata.
//!
//! A native module describes the types it exports as a flat list of
//! [`NativeTypeInfo`] entries. Names of generic types carry an arity suffix
//! (`` List`1 ``), the form the runtime demangles when it builds namespace
//! trees.

use std::fmt;
use std::rc::Rc;

use pyhost_diagnostics::{Diagnostic, DiagnosticKind, codes};
use serde::{Deserialize, Serialize};

use crate::map::{FastHashMap, fast_map_new};

/// Identity of a host type. Declared types use their full, still-mangled
/// name (`Geo.Bag`1`). Namespace placeholders, which group every arity of a
/// generic under one script-visible name, use the demangled dotted path
/// (`Geo.Bag`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostTypeId(Rc<str>);

impl HostTypeId {
    pub fn new(full_name: &str) -> Self {
        Self(Rc::from(full_name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last dotted segment, arity suffix included.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit_once('.').map(|(_, n)| n).unwrap_or(&self.0)
    }
}

impl fmt::Debug for HostTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTypeId({})", self.0)
    }
}

impl fmt::Display for HostTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identities of the host types backing the built-in value kinds.
pub mod builtin_types {
    pub const NONE: &str = "builtins.NoneType";
    pub const BOOL: &str = "builtins.bool";
    pub const INT: &str = "builtins.int";
    pub const FLOAT: &str = "builtins.float";
    pub const STR: &str = "builtins.str";
    pub const LIST: &str = "builtins.list";
    pub const TUPLE: &str = "builtins.tuple";
    pub const DICT: &str = "builtins.dict";
    pub const SET: &str = "builtins.set";
    pub const RANGE: &str = "builtins.range";
    pub const ITERATOR: &str = "builtins.iterator";
}

/// Result of splitting an arity suffix off a type name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mangled<'a> {
    Plain(&'a str),
    Generic(&'a str, usize),
    /// A backtick is present but not followed by digits only.
    Malformed(&'a str),
}

impl<'a> Mangled<'a> {
    pub fn base(&self) -> &'a str {
        match *self {
            Mangled::Plain(n) | Mangled::Malformed(n) => n,
            Mangled::Generic(n, _) => n,
        }
    }

    pub fn arity(&self) -> Option<usize> {
        match *self {
            Mangled::Generic(_, a) => Some(a),
            _ => None,
        }
    }
}

pub fn split_arity(name: &str) -> Mangled<'_> {
    let Some((base, suffix)) = name.rsplit_once('`') else {
        return Mangled::Plain(name);
    };
    if base.is_empty() || suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return Mangled::Malformed(name);
    }
    match suffix.parse::<usize>() {
        Ok(arity) => Mangled::Generic(base, arity),
        Err(_) => Mangled::Malformed(name),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub default: serde_json::Value,
}

fn default_public() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NativeTypeInfo {
    /// Dot-separated namespace path; empty for the global namespace.
    #[serde(default)]
    pub namespace: String,
    pub name: String,
    #[serde(default = "default_public")]
    pub public: bool,
    #[serde(default)]
    pub constructible: bool,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl NativeTypeInfo {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            public: true,
            constructible: false,
            fields: Vec::new(),
        }
    }

    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }

    pub fn with_field(mut self, name: &str, default: serde_json::Value) -> Self {
        self.constructible = true;
        self.fields.push(FieldSpec {
            name: name.to_string(),
            default,
        });
        self
    }

    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    pub fn id(&self) -> HostTypeId {
        HostTypeId::new(&self.full_name())
    }

    pub fn mangled(&self) -> Mangled<'_> {
        split_arity(&self.name)
    }

    /// Name with any arity suffix removed.
    pub fn simple_name(&self) -> &str {
        self.mangled().base()
    }
}

/// On-disk description of a native module.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NativeModuleManifest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub types: Vec<NativeTypeInfo>,
}

impl NativeModuleManifest {
    pub fn parse(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }

    /// Drops unusable entries and reports what was wrong with the rest.
    pub fn sanitize(&mut self, origin: &str) -> Vec<Diagnostic> {
        let mut diags = Vec::new();
        let mut seen: FastHashMap<String, ()> = fast_map_new();
        self.types.retain(|t| {
            if t.name.is_empty() {
                diags.push(
                    Diagnostic::warning_kind(DiagnosticKind::EmptyTypeName(t.namespace.clone()))
                        .with_code(codes::EMPTY_TYPE_NAME)
                        .with_origin(origin),
                );
                return false;
            }
            let full = t.full_name();
            if seen.insert(full.clone(), ()).is_some() {
                diags.push(
                    Diagnostic::warning_kind(DiagnosticKind::DuplicateType(full))
                        .with_code(codes::DUPLICATE_TYPE)
                        .with_origin(origin),
                );
                return false;
            }
            if let Mangled::Malformed(n) = t.mangled() {
                diags.push(
                    Diagnostic::warning_kind(DiagnosticKind::BadAritySuffix(n.to_string()))
                        .with_code(codes::BAD_ARITY_SUFFIX)
                        .with_origin(origin)
                        .with_help("generic type names end in a backtick followed by digits"),
                );
            }
            true
        });
        diags
    }
}

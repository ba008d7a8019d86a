use std::fmt;

/// Language-level exception class a failure surfaces as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExceptionClass {
    Exception,
    AttributeError,
    LookupError,
    ModuleNotFoundError,
    ImportError,
    TypeError,
    ValueError,
    IndexError,
    KeyError,
    StopIteration,
}

impl ExceptionClass {
    pub fn name(self) -> &'static str {
        match self {
            ExceptionClass::Exception => "Exception",
            ExceptionClass::AttributeError => "AttributeError",
            ExceptionClass::LookupError => "LookupError",
            ExceptionClass::ModuleNotFoundError => "ModuleNotFoundError",
            ExceptionClass::ImportError => "ImportError",
            ExceptionClass::TypeError => "TypeError",
            ExceptionClass::ValueError => "ValueError",
            ExceptionClass::IndexError => "IndexError",
            ExceptionClass::KeyError => "KeyError",
            ExceptionClass::StopIteration => "StopIteration",
        }
    }

    /// `ModuleNotFoundError` is an `ImportError`; `IndexError` and `KeyError`
    /// are `LookupError`s.
    pub fn is_a(self, other: ExceptionClass) -> bool {
        if self == other || other == ExceptionClass::Exception {
            return true;
        }
        matches!(
            (self, other),
            (ExceptionClass::ModuleNotFoundError, ExceptionClass::ImportError)
                | (ExceptionClass::IndexError, ExceptionClass::LookupError)
                | (ExceptionClass::KeyError, ExceptionClass::LookupError)
        )
    }
}

impl fmt::Display for ExceptionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub enum DiagnosticKind {
    // Attribute resolution
    MissingAttribute {
        ty: String,
        name: String,
        suggestion: Option<String>,
    },
    MissingTypeAttribute {
        ty: String,
        name: String,
    },
    MissingModuleAttribute {
        module: String,
        name: String,
    },
    MissingNamespaceMember {
        path: String,
        name: String,
    },
    NativeMissingAttribute {
        ty: String,
        name: String,
    },
    NoBaseForSuper(String),
    SuperRequiresInstance(String),

    // Import
    ModuleNotFound(String),
    CannotImportName {
        name: String,
        module: String,
    },
    CircularImport(Vec<String>),
    FrontendMissing(String),
    NativeLoadFailed {
        path: String,
        reason: String,
    },
    SourceReadFailed {
        path: String,
        reason: String,
    },
    CompileFailed {
        path: String,
        reason: String,
    },

    // Manifest warnings
    EmptyTypeName(String),
    BadAritySuffix(String),
    DuplicateType(String),

    // Calls and types
    NotCallable(String),
    NoConstructor(String),
    ArgumentCountMismatch {
        name: String,
        expected_min: usize,
        expected_max: usize,
        actual: usize,
    },
    TypeMismatch {
        expected: String,
        actual: String,
    },
    Unhashable(String),
    NotIterable(String),
    NoLength(String),
    NotSubscriptable(String),
    NoGenericArity {
        ty: String,
        arity: usize,
    },
    Unorderable {
        op: &'static str,
        left: String,
        right: String,
    },

    // Values
    ZeroStep(&'static str),
    EmptySequence(&'static str),
    InvalidLiteral {
        ty: &'static str,
        text: String,
    },
    IndexOutOfRange,
    NotInList(&'static str),
    EmptySeparator,
    KeyNotFound(String),
    IterationFinished,

    Raw(String),
}

impl DiagnosticKind {
    pub fn exception_class(&self) -> ExceptionClass {
        match self {
            DiagnosticKind::MissingAttribute { .. }
            | DiagnosticKind::MissingModuleAttribute { .. }
            | DiagnosticKind::MissingNamespaceMember { .. }
            | DiagnosticKind::NativeMissingAttribute { .. } => ExceptionClass::AttributeError,
            DiagnosticKind::MissingTypeAttribute { .. } => ExceptionClass::LookupError,
            DiagnosticKind::ModuleNotFound(_) => ExceptionClass::ModuleNotFoundError,
            DiagnosticKind::CannotImportName { .. }
            | DiagnosticKind::CircularImport(_)
            | DiagnosticKind::FrontendMissing(_)
            | DiagnosticKind::NativeLoadFailed { .. }
            | DiagnosticKind::SourceReadFailed { .. }
            | DiagnosticKind::CompileFailed { .. } => ExceptionClass::ImportError,
            DiagnosticKind::NoBaseForSuper(_)
            | DiagnosticKind::SuperRequiresInstance(_)
            | DiagnosticKind::NotCallable(_)
            | DiagnosticKind::NoConstructor(_)
            | DiagnosticKind::ArgumentCountMismatch { .. }
            | DiagnosticKind::TypeMismatch { .. }
            | DiagnosticKind::Unhashable(_)
            | DiagnosticKind::NotIterable(_)
            | DiagnosticKind::NoLength(_)
            | DiagnosticKind::NotSubscriptable(_)
            | DiagnosticKind::NoGenericArity { .. }
            | DiagnosticKind::Unorderable { .. } => ExceptionClass::TypeError,
            DiagnosticKind::ZeroStep(_)
            | DiagnosticKind::EmptySequence(_)
            | DiagnosticKind::InvalidLiteral { .. }
            | DiagnosticKind::NotInList(_)
            | DiagnosticKind::EmptySeparator => ExceptionClass::ValueError,
            DiagnosticKind::IndexOutOfRange => ExceptionClass::IndexError,
            DiagnosticKind::KeyNotFound(_) => ExceptionClass::KeyError,
            DiagnosticKind::IterationFinished => ExceptionClass::StopIteration,
            DiagnosticKind::EmptyTypeName(_)
            | DiagnosticKind::BadAritySuffix(_)
            | DiagnosticKind::DuplicateType(_)
            | DiagnosticKind::Raw(_) => ExceptionClass::Exception,
        }
    }
}

pub struct DiagnosticsFormatter;

impl DiagnosticsFormatter {
    fn format_en(kind: &DiagnosticKind) -> String {
        match kind {
            DiagnosticKind::MissingAttribute {
                ty,
                name,
                suggestion,
            } => match suggestion {
                Some(s) => format!(
                    "object '{}' has no attribute '{}'; did you mean '{}'?",
                    ty, name, s
                ),
                None => format!("object '{}' has no attribute '{}'", ty, name),
            },
            DiagnosticKind::MissingTypeAttribute { ty, name } => {
                format!("type '{}' has no attribute '{}'", ty, name)
            }
            DiagnosticKind::MissingModuleAttribute { module, name } => {
                format!("module '{}' has no attribute '{}'", module, name)
            }
            DiagnosticKind::MissingNamespaceMember { path, name } => {
                format!("namespace '{}' has no member '{}'", path, name)
            }
            DiagnosticKind::NativeMissingAttribute { ty, name } => {
                format!("'{}' object has no attribute '{}'", ty, name)
            }
            DiagnosticKind::NoBaseForSuper(ty) => format!("super(): type '{}' has no base", ty),
            DiagnosticKind::SuperRequiresInstance(actual) => {
                format!("super(): expected an object instance, got '{}'", actual)
            }

            DiagnosticKind::ModuleNotFound(name) => format!("No module named '{}'", name),
            DiagnosticKind::CannotImportName { name, module } => {
                format!("cannot import name '{}' from '{}'", name, module)
            }
            DiagnosticKind::CircularImport(chain) => {
                format!("Circular import: {}", chain.join(" -> "))
            }
            DiagnosticKind::FrontendMissing(path) => {
                format!("no frontend configured to compile source module '{}'", path)
            }
            DiagnosticKind::NativeLoadFailed { path, reason } => {
                format!("failed to load native module '{}': {}", path, reason)
            }
            DiagnosticKind::SourceReadFailed { path, reason } => {
                format!("failed to read source module '{}': {}", path, reason)
            }
            DiagnosticKind::CompileFailed { path, reason } => {
                format!("failed to compile '{}': {}", path, reason)
            }

            DiagnosticKind::EmptyTypeName(ns) => {
                format!("type entry with an empty name in namespace '{}' was skipped", ns)
            }
            DiagnosticKind::BadAritySuffix(name) => {
                format!("type '{}' has a malformed generic arity suffix", name)
            }
            DiagnosticKind::DuplicateType(name) => {
                format!("type '{}' is declared more than once", name)
            }

            DiagnosticKind::NotCallable(ty) => format!("'{}' object is not callable", ty),
            DiagnosticKind::NoConstructor(ty) => {
                format!("Type '{}' has no constructor with given arguments", ty)
            }
            DiagnosticKind::ArgumentCountMismatch {
                name,
                expected_min,
                expected_max,
                actual,
            } => {
                if expected_min == expected_max {
                    format!(
                        "{}() expected {} arguments but got {}",
                        name, expected_min, actual
                    )
                } else {
                    format!(
                        "{}() expected {}..{} arguments but got {}",
                        name, expected_min, expected_max, actual
                    )
                }
            }
            DiagnosticKind::TypeMismatch { expected, actual } => {
                format!("expected {} but got {}", expected, actual)
            }
            DiagnosticKind::Unhashable(ty) => format!("unhashable type: '{}'", ty),
            DiagnosticKind::NotIterable(ty) => format!("'{}' object is not iterable", ty),
            DiagnosticKind::NoLength(ty) => format!("object of type '{}' has no len()", ty),
            DiagnosticKind::NotSubscriptable(ty) => {
                format!("'{}' object is not subscriptable", ty)
            }
            DiagnosticKind::NoGenericArity { ty, arity } => {
                format!("type '{}' has no generic form with {} parameters", ty, arity)
            }
            DiagnosticKind::Unorderable { op, left, right } => format!(
                "'{}' not supported between instances of '{}' and '{}'",
                op, left, right
            ),

            DiagnosticKind::ZeroStep(what) => format!("{} step cannot be zero", what),
            DiagnosticKind::EmptySequence(func) => format!("{}() arg is an empty sequence", func),
            DiagnosticKind::InvalidLiteral { ty, text } => {
                format!("invalid literal for {}(): '{}'", ty, text)
            }
            DiagnosticKind::IndexOutOfRange => "Index out of range".into(),
            DiagnosticKind::NotInList(method) => format!("{}(x): x not in list", method),
            DiagnosticKind::EmptySeparator => "empty separator".into(),
            DiagnosticKind::KeyNotFound(key) => format!("Key not found: {}", key),
            DiagnosticKind::IterationFinished => "iteration finished".into(),

            DiagnosticKind::Raw(s) => s.clone(),
        }
    }

    pub fn format(kind: &DiagnosticKind) -> String {
        Self::format_en(kind)
    }
}

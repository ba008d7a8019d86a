//! Runtime error type and common message constants.

use std::fmt;

use pyhost_diagnostics::{DiagnosticKind, DiagnosticsFormatter, ExceptionClass};

/// A raised exception: its class and formatted message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeError {
    pub class: ExceptionClass,
    pub message: String,
}

impl RuntimeError {
    pub fn new(class: ExceptionClass, message: impl Into<String>) -> Self {
        Self {
            class,
            message: message.into(),
        }
    }

    pub fn from_kind(kind: &DiagnosticKind) -> Self {
        Self::new(kind.exception_class(), DiagnosticsFormatter::format(kind))
    }

    /// `except cls:` semantics.
    pub fn is_a(&self, class: ExceptionClass) -> bool {
        self.class.is_a(class)
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.class, self.message)
    }
}

impl std::error::Error for RuntimeError {}

pub mod messages {
    pub const NOT_A_STRING: &str = "Not a string";
    pub const NOT_AN_INT: &str = "Not an int";
    pub const NOT_A_TYPE: &str = "Not a type";
    pub const NOT_A_FUNCTION: &str = "Not a function";
    pub const ATTR_NAME_NOT_STRING: &str = "attribute name must be a string";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_class_name() {
        let e = RuntimeError::from_kind(&DiagnosticKind::ModuleNotFound("geo".into()));
        assert_eq!(e.to_string(), "ModuleNotFoundError: No module named 'geo'");
        assert!(e.is_a(ExceptionClass::ImportError));
    }
}

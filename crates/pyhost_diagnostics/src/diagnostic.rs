//! Non-fatal findings reported while loading modules.

use crate::{DiagnosticKind, DiagnosticsFormatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub code: Option<&'static str>,
    /// File the finding belongs to, when known.
    pub origin: Option<String>,
    pub help: Option<String>,
}

impl Diagnostic {
    fn plain(severity: Severity, message: String) -> Self {
        Self {
            severity,
            message,
            code: None,
            origin: None,
            help: None,
        }
    }

    pub fn new(severity: Severity, kind: DiagnosticKind) -> Self {
        Self::plain(severity, DiagnosticsFormatter::format(&kind))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::plain(Severity::Error, message.into())
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::plain(Severity::Warning, message.into())
    }

    pub fn warning_kind(kind: DiagnosticKind) -> Self {
        Self::new(Severity::Warning, kind)
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

pub mod codes {
    pub const EMPTY_TYPE_NAME: &str = "W0101";
    pub const BAD_ARITY_SUFFIX: &str = "W0102";
    pub const DUPLICATE_TYPE: &str = "W0103";
}

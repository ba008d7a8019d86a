//! Diagnostics shared by the pyhost runtime and CLI.
//!
mod diagnostic;
mod loc;
mod render;
mod util;

pub use diagnostic::{Diagnostic, Severity, codes};
pub use loc::{DiagnosticKind, DiagnosticsFormatter, ExceptionClass};
pub use render::{render_diagnostic, render_diagnostics};
pub use util::{find_best_match, levenshtein_distance};

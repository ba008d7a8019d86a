//! The `Runtime` struct: configuration, execution contexts and the
//! collaborators it delegates to.

mod config;
mod core;

pub use self::core::{MAIN_CONTEXT, Runtime};
pub use config::{ExecResult, RuntimeConfig};

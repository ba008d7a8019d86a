use std::io::Write;
use std::path::Path;

use pyhost_diagnostics::render_diagnostics;
use pyhost_runtime::{NativeModule, parse_manifest};

use crate::args::CliArgs;

pub(crate) mod resolve;
pub(crate) mod tree;
pub(crate) mod types;

/// The single positional argument of a command, or exit 2.
pub(crate) fn single_positional<'a>(args: &'a CliArgs, what: &str) -> &'a str {
    if args.positional.len() != 1 {
        eprintln!("Missing <{what}>");
        std::process::exit(2);
    }
    args.positional[0].as_str()
}

/// Reads and parses a native module manifest. Sanitizer findings go to
/// stderr; unreadable or malformed files exit 1.
pub(crate) fn load_manifest(path: &str) -> NativeModule {
    let path = Path::new(path);
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Read failed: {}: {e}", path.display());
            std::process::exit(1);
        }
    };
    let module = match parse_manifest(path, &text) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    if !module.diagnostics.is_empty() {
        eprintln!("{}", render_diagnostics(&module.diagnostics));
    }
    module
}

pub(crate) fn write_stdout(text: &str) {
    let mut out = std::io::stdout().lock();
    if let Err(e) = out.write_all(text.as_bytes()) {
        if e.kind() == std::io::ErrorKind::BrokenPipe {
            return;
        }
        eprintln!("stdout error: {e}");
        std::process::exit(2);
    }
}

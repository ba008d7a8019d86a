use pyhost_runtime::{Runtime, RuntimeConfig};

use crate::args::CliArgs;
use crate::commands::{single_positional, write_stdout};

pub(crate) fn run(args: &CliArgs) {
    let name = single_positional(args, "name");
    let mut config = RuntimeConfig::from_env();
    if args.cwd.is_some() {
        config.current_dir = args.cwd.clone();
    }
    if args.home.is_some() {
        config.install_dir = args.home.clone();
    }
    config.trace_imports |= args.verbose;

    let rt = Runtime::with_config(config);
    match rt.resolve_module(name) {
        Ok(found) => write_stdout(&format!("tier {}: {}\n", found.tier, found.path.display())),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

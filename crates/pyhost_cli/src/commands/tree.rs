use pyhost_runtime::NamespaceTree;

use crate::args::CliArgs;
use crate::commands::{load_manifest, single_positional, write_stdout};

pub(crate) fn run(args: &CliArgs) {
    let path = single_positional(args, "file");
    let module = load_manifest(path);
    let mut tree = NamespaceTree::new();
    tree.insert_all(module.public_types());
    if args.verbose {
        eprintln!("module: {} ({} types)", module.name, module.types.len());
    }
    write_stdout(&tree.render());
}

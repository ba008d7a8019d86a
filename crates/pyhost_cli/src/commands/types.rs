use crate::args::CliArgs;
use crate::commands::{load_manifest, single_positional, write_stdout};

pub(crate) fn run(args: &CliArgs) {
    let path = single_positional(args, "file");
    let module = load_manifest(path);
    let mut out = String::new();
    for t in &module.types {
        let visibility = if t.public { "public" } else { "private" };
        let arity = t.mangled().arity().unwrap_or(0);
        out.push_str(&format!("{visibility}\t{}\tarity={arity}", t.full_name()));
        if args.verbose && !t.fields.is_empty() {
            let fields: Vec<&str> = t.fields.iter().map(|f| f.name.as_str()).collect();
            out.push_str(&format!("\tfields={}", fields.join(",")));
        }
        out.push('\n');
    }
    write_stdout(&out);
}

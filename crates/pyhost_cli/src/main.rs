mod args;
mod commands;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() {
    let args = match args::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    match args.cmd.as_str() {
        "resolve" => commands::resolve::run(&args),
        "tree" => commands::tree::run(&args),
        "types" => commands::types::run(&args),
        _ => {
            eprintln!("Unknown command: {}", args.cmd);
            eprintln!("{}", args::usage());
            std::process::exit(2);
        }
    }
}

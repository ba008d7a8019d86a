use std::path::PathBuf;

pub(crate) struct CliArgs {
    pub cmd: String,
    pub verbose: bool,
    pub cwd: Option<PathBuf>,
    pub home: Option<PathBuf>,
    pub positional: Vec<String>,
}

pub(crate) fn usage() -> &'static str {
    "Usage: pyhost <resolve|tree|types> [verbose] [cwd=<dir>] [home=<dir>] <args>"
}

pub(crate) fn parse_args() -> Result<CliArgs, String> {
    parse_from(std::env::args().skip(1).collect())
}

pub(crate) fn parse_from(mut argv: Vec<String>) -> Result<CliArgs, String> {
    if argv.is_empty() {
        return Err(usage().to_string());
    }
    let cmd = argv.remove(0);

    let mut verbose = false;
    let mut cwd = None;
    let mut home = None;
    let mut positional: Vec<String> = Vec::new();

    for a in argv {
        if a.starts_with("--") {
            return Err(format!("Unknown option: {a}"));
        }
        if a == "verbose" {
            verbose = true;
        } else if let Some(dir) = a.strip_prefix("cwd=") {
            cwd = Some(PathBuf::from(dir));
        } else if let Some(dir) = a.strip_prefix("home=") {
            home = Some(PathBuf::from(dir));
        } else {
            positional.push(a);
        }
    }

    Ok(CliArgs {
        cmd,
        verbose,
        cwd,
        home,
        positional,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(s: &[&str]) -> Vec<String> {
        s.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn flags_may_appear_anywhere() {
        let args = parse_from(argv(&["resolve", "json", "verbose", "cwd=/tmp/x"])).unwrap();
        assert_eq!(args.cmd, "resolve");
        assert!(args.verbose);
        assert_eq!(args.cwd, Some(PathBuf::from("/tmp/x")));
        assert_eq!(args.home, None);
        assert_eq!(args.positional, vec!["json".to_string()]);
    }

    #[test]
    fn dashed_options_are_rejected() {
        let err = parse_from(argv(&["tree", "--color"])).err().unwrap();
        assert_eq!(err, "Unknown option: --color");
        assert!(parse_from(Vec::new()).is_err());
    }
}

//! Runtime configuration and result types.

use std::path::PathBuf;

/// Result of executing a program.
#[derive(Debug)]
pub struct ExecResult {
    /// Everything `print` wrote while the program ran.
    pub output: String,
}

/// Runtime configuration options.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Extension of interpreted source modules, without the dot.
    pub source_ext: String,
    /// Extension of native module manifests, without the dot.
    pub native_ext: String,
    /// Directory searched by tiers 2 and 3. Defaults to the process cwd.
    pub current_dir: Option<PathBuf>,
    /// Installation root; `<install_dir>/lib` is tier 4. Defaults to the
    /// directory holding the running executable.
    pub install_dir: Option<PathBuf>,
    /// Overrides the native host's own base library directory (tier 5).
    pub base_library_dir: Option<PathBuf>,
    pub trace_imports: bool,
    /// Also write `print` output to stdout.
    pub echo_output: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            source_ext: "py".into(),
            native_ext: "nlib".into(),
            current_dir: None,
            install_dir: None,
            base_library_dir: None,
            trace_imports: false,
            echo_output: false,
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

impl RuntimeConfig {
    /// Defaults overlaid with `PYHOST_HOME`, `PYHOST_BASE_LIB` and
    /// `PYHOST_TRACE_IMPORT`.
    pub fn from_env() -> Self {
        Self {
            install_dir: env_path("PYHOST_HOME"),
            base_library_dir: env_path("PYHOST_BASE_LIB"),
            trace_imports: env_flag("PYHOST_TRACE_IMPORT"),
            ..Self::default()
        }
    }

    pub fn resolved_current_dir(&self) -> PathBuf {
        match &self.current_dir {
            Some(d) => d.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    pub fn resolved_install_dir(&self) -> Option<PathBuf> {
        if let Some(d) = &self.install_dir {
            return Some(d.clone());
        }
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dirs_win_over_process_defaults() {
        let cfg = RuntimeConfig {
            current_dir: Some(PathBuf::from("/work")),
            install_dir: Some(PathBuf::from("/opt/pyhost")),
            ..RuntimeConfig::default()
        };
        assert_eq!(cfg.resolved_current_dir(), PathBuf::from("/work"));
        assert_eq!(cfg.resolved_install_dir(), Some(PathBuf::from("/opt/pyhost")));
        assert_eq!(cfg.source_ext, "py");
        assert_eq!(cfg.native_ext, "nlib");
    }
}

use std::fmt;
use std::path::{Path, PathBuf};

use pyhost_diagnostics::DiagnosticKind;

use crate::errors::RuntimeError;
use crate::runtime::Runtime;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImportStamp {
    pub len: u64,
    pub modified_nanos: Option<u128>,
}

/// Where a module was found, in search order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SearchTier {
    /// The name itself is a path.
    Direct,
    CurrentDirSource,
    CurrentDirNative,
    InstallLib,
    HostBaseLibrary,
}

impl SearchTier {
    pub fn number(self) -> u8 {
        match self {
            SearchTier::Direct => 1,
            SearchTier::CurrentDirSource => 2,
            SearchTier::CurrentDirNative => 3,
            SearchTier::InstallLib => 4,
            SearchTier::HostBaseLibrary => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SearchTier::Direct => "direct",
            SearchTier::CurrentDirSource => "cwd-source",
            SearchTier::CurrentDirNative => "cwd-native",
            SearchTier::InstallLib => "install-lib",
            SearchTier::HostBaseLibrary => "host-base",
        }
    }
}

impl fmt::Display for SearchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModuleKind {
    Source,
    Native,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedModule {
    pub tier: SearchTier,
    pub path: PathBuf,
    pub kind: ModuleKind,
}

pub trait ModuleLoader {
    fn resolve(&self, rt: &Runtime, name: &str) -> Result<ResolvedModule, RuntimeError>;
    fn load_text_and_stamp(
        &self,
        rt: &Runtime,
        path: &Path,
    ) -> Result<(String, ImportStamp), RuntimeError>;
}

/// Searches the five tiers in order; the first existing file wins.
pub struct StdModuleLoader;

/// Candidate files for `name`, in search order. Tiers whose base directory
/// is unknown are left out.
pub fn candidates(rt: &Runtime, name: &str) -> Vec<(SearchTier, PathBuf)> {
    let cfg = rt.config();
    let cwd = rt.current_dir();
    let direct = PathBuf::from(name);
    let direct = if direct.is_absolute() {
        direct
    } else {
        cwd.join(direct)
    };
    let mut out = vec![
        (SearchTier::Direct, direct),
        (
            SearchTier::CurrentDirSource,
            cwd.join(format!("{}.{}", name, cfg.source_ext)),
        ),
        (
            SearchTier::CurrentDirNative,
            cwd.join(format!("{}.{}", name, cfg.native_ext)),
        ),
    ];
    if let Some(home) = rt.install_dir() {
        out.push((
            SearchTier::InstallLib,
            home.join("lib").join(format!("{}.{}", name, cfg.source_ext)),
        ));
    }
    if let Some(base) = rt.base_library_dir() {
        out.push((
            SearchTier::HostBaseLibrary,
            base.join(format!("{}.{}", name, cfg.native_ext)),
        ));
    }
    out
}

fn kind_of(rt: &Runtime, path: &Path) -> ModuleKind {
    let native = path
        .extension()
        .is_some_and(|e| e.to_string_lossy() == rt.config().native_ext);
    if native {
        ModuleKind::Native
    } else {
        ModuleKind::Source
    }
}

impl ModuleLoader for StdModuleLoader {
    fn resolve(&self, rt: &Runtime, name: &str) -> Result<ResolvedModule, RuntimeError> {
        for (tier, path) in candidates(rt, name) {
            if rt.fs().is_file(&path) {
                let kind = kind_of(rt, &path);
                return Ok(ResolvedModule { tier, path, kind });
            }
        }
        Err(rt.error(DiagnosticKind::ModuleNotFound(name.to_string())))
    }

    fn load_text_and_stamp(
        &self,
        rt: &Runtime,
        path: &Path,
    ) -> Result<(String, ImportStamp), RuntimeError> {
        let read_failed = |reason: String| {
            rt.error(DiagnosticKind::SourceReadFailed {
                path: path.display().to_string(),
                reason,
            })
        };
        let stat = rt.fs().stat(path).map_err(read_failed)?;
        let text = rt.fs().read_to_string(path).map_err(read_failed)?;
        Ok((
            text,
            ImportStamp {
                len: stat.len,
                modified_nanos: stat.modified_nanos,
            },
        ))
    }
}

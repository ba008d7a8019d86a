//! System capability traits for dependency injection.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

pub trait FileSystem {
    fn is_file(&self, path: &Path) -> bool;
    fn stat(&self, path: &Path) -> Result<FileStat, String>;
    fn canonicalize(&self, path: &Path) -> Result<PathBuf, String>;
    fn read_to_string(&self, path: &Path) -> Result<String, String>;
}

pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
    }

    fn stat(&self, path: &Path) -> Result<FileStat, String> {
        let meta = std::fs::metadata(path).map_err(|e| e.to_string())?;
        let modified_nanos = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_nanos());
        Ok(FileStat {
            len: meta.len(),
            modified_nanos,
        })
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf, String> {
        std::fs::canonicalize(path).map_err(|e| e.to_string())
    }

    fn read_to_string(&self, path: &Path) -> Result<String, String> {
        std::fs::read_to_string(path).map_err(|e| e.to_string())
    }
}

pub struct Capabilities {
    pub fs: Box<dyn FileSystem>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            fs: Box::new(StdFileSystem),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileStat {
    pub len: u64,
    pub modified_nanos: Option<u128>,
}

mod common;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use common::{LineFrontend, global};
use pyhost_core::{Capabilities, FileStat, FileSystem};
use pyhost_runtime::{
    ImportStamp, ModuleKind, ModuleLoader, ResolvedModule, Runtime, RuntimeConfig, RuntimeError,
    SearchTier, Value,
};

struct MemoryFs {
    files: HashMap<PathBuf, String>,
}

impl MemoryFs {
    fn with(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(p, t)| (PathBuf::from(p), t.to_string()))
                .collect(),
        }
    }
}

impl FileSystem for MemoryFs {
    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn stat(&self, path: &Path) -> Result<FileStat, String> {
        match self.files.get(path) {
            Some(text) => Ok(FileStat {
                len: text.len() as u64,
                modified_nanos: None,
            }),
            None => Err(format!("no such file: {}", path.display())),
        }
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf, String> {
        Ok(path.to_path_buf())
    }

    fn read_to_string(&self, path: &Path) -> Result<String, String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| format!("no such file: {}", path.display()))
    }
}

fn virtual_config() -> RuntimeConfig {
    RuntimeConfig {
        current_dir: Some(PathBuf::from("/virtual")),
        install_dir: Some(PathBuf::from("/virtual-home")),
        base_library_dir: Some(PathBuf::from("/virtual-base")),
        ..RuntimeConfig::default()
    }
}

#[test]
fn resolver_reads_through_the_injected_file_system() {
    let mut rt = Runtime::with_config(virtual_config());
    rt.set_capabilities(Capabilities {
        fs: Box::new(MemoryFs::with(&[
            ("/virtual/greet.py", "msg = hi"),
            ("/virtual-base/geo.nlib", common::GEO_MANIFEST),
        ])),
    });
    rt.set_frontend(Rc::new(LineFrontend));

    let found = rt.resolve_module("greet").unwrap();
    assert_eq!(found.tier, SearchTier::CurrentDirSource);
    rt.import("greet", None).unwrap();
    let m = global(&rt, "greet");
    assert_eq!(rt.get_attr(&m, "msg").unwrap(), Value::str("hi"));

    let found = rt.resolve_module("geo").unwrap();
    assert_eq!(found.tier, SearchTier::HostBaseLibrary);
    rt.import("geo", Some(pyhost_runtime::Selective::Names(vec!["Point".into()])))
        .unwrap();
    assert!(matches!(rt.get_global("Point"), Some(Value::NativeType(_))));
}

struct FixedLoader;

impl ModuleLoader for FixedLoader {
    fn resolve(&self, _rt: &Runtime, name: &str) -> Result<ResolvedModule, RuntimeError> {
        Ok(ResolvedModule {
            tier: SearchTier::Direct,
            path: PathBuf::from(format!("/fixed/{name}.py")),
            kind: ModuleKind::Source,
        })
    }

    fn load_text_and_stamp(
        &self,
        _rt: &Runtime,
        path: &Path,
    ) -> Result<(String, ImportStamp), RuntimeError> {
        let text = format!("origin = {}", path.display());
        let stamp = ImportStamp {
            len: text.len() as u64,
            modified_nanos: None,
        };
        Ok((text, stamp))
    }
}

#[test]
fn custom_module_loader_replaces_the_search() {
    let mut rt = Runtime::new();
    rt.set_module_loader(Box::new(FixedLoader));
    rt.set_frontend(Rc::new(LineFrontend));
    rt.import("anything", None).unwrap();
    let m = global(&rt, "anything");
    assert_eq!(rt.get_attr(&m, "origin").unwrap(), Value::str("/fixed/anything.py"));
}

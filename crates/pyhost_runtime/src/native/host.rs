//! Loading native modules through the host introspection facility.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use pyhost_core::{FastHashMap, FileSystem, NativeModuleManifest, NativeTypeInfo, fast_map_new};
use pyhost_diagnostics::Diagnostic;

use crate::modules::ImportStamp;

/// Type metadata of one loaded native module.
#[derive(Debug)]
pub struct NativeModule {
    pub name: String,
    pub path: PathBuf,
    pub types: Vec<Rc<NativeTypeInfo>>,
    /// Findings from sanitizing the metadata; skipped entries are reported
    /// here instead of failing the load.
    pub diagnostics: Vec<Diagnostic>,
}

impl NativeModule {
    pub fn public_types(&self) -> impl Iterator<Item = &Rc<NativeTypeInfo>> {
        self.types.iter().filter(|t| t.public)
    }

    /// A public type declared directly in the namespace named after the
    /// module, by demangled name. The plain entry is preferred over generic
    /// ones.
    pub fn exported_type(&self, name: &str) -> Option<&Rc<NativeTypeInfo>> {
        let mut generic = None;
        for t in self.public_types() {
            if t.namespace != self.name || t.simple_name() != name {
                continue;
            }
            if t.mangled().arity().is_none() {
                return Some(t);
            }
            generic.get_or_insert(t);
        }
        generic
    }
}

pub trait NativeHost {
    fn load_module(&mut self, fs: &dyn FileSystem, path: &Path) -> Result<Rc<NativeModule>, String>;
    /// Directory holding the host's own native libraries (search tier 5).
    fn base_library_dir(&self) -> Option<PathBuf>;
}

/// Reads native modules as JSON manifests. Parsed modules are cached per
/// path and reloaded when the file's length or mtime changes.
pub struct ManifestHost {
    cache: FastHashMap<PathBuf, (ImportStamp, Rc<NativeModule>)>,
    base_dir: Option<PathBuf>,
}

impl ManifestHost {
    pub fn new() -> Self {
        Self {
            cache: fast_map_new(),
            base_dir: None,
        }
    }

    pub fn with_base_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            cache: fast_map_new(),
            base_dir: Some(dir.into()),
        }
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

impl Default for ManifestHost {
    fn default() -> Self {
        Self::new()
    }
}

fn module_name(manifest: &NativeModuleManifest, path: &Path) -> String {
    if !manifest.name.is_empty() {
        return manifest.name.clone();
    }
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn parse_manifest(path: &Path, text: &str) -> Result<NativeModule, String> {
    let mut manifest = NativeModuleManifest::parse(text)?;
    let diagnostics = manifest.sanitize(&path.to_string_lossy());
    let name = module_name(&manifest, path);
    Ok(NativeModule {
        name,
        path: path.to_path_buf(),
        types: manifest.types.into_iter().map(Rc::new).collect(),
        diagnostics,
    })
}

impl NativeHost for ManifestHost {
    fn load_module(&mut self, fs: &dyn FileSystem, path: &Path) -> Result<Rc<NativeModule>, String> {
        let key = fs.canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let stat = fs.stat(&key)?;
        let stamp = ImportStamp {
            len: stat.len,
            modified_nanos: stat.modified_nanos,
        };
        if let Some((cached, module)) = self.cache.get(&key) {
            if *cached == stamp {
                return Ok(module.clone());
            }
        }
        let text = fs.read_to_string(&key)?;
        let module = Rc::new(parse_manifest(&key, &text)?);
        self.cache.insert(key, (stamp, module.clone()));
        Ok(module)
    }

    fn base_library_dir(&self) -> Option<PathBuf> {
        self.base_dir.clone()
    }
}

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use pyhost_runtime::{Frontend, ManifestHost, Program, Runtime, RuntimeConfig, RuntimeError, Value};

/// Compiles a source module by looking up a closure registered under the
/// file's stem. The file text is ignored.
#[derive(Default)]
pub struct ScriptedFrontend {
    scripts: HashMap<String, Program>,
}

impl ScriptedFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script<F>(mut self, stem: &str, f: F) -> Self
    where
        F: Fn(&mut Runtime) -> Result<(), RuntimeError> + 'static,
    {
        self.scripts.insert(stem.to_string(), Rc::new(f));
        self
    }
}

impl Frontend for ScriptedFrontend {
    fn compile(&self, path: &Path, _text: &str) -> Result<Program, String> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.scripts
            .get(&stem)
            .cloned()
            .ok_or_else(|| format!("no script for '{}'", stem))
    }
}

/// Compiles a tiny line language: `name = text` binds a string global,
/// `import m` and `from m import a, b` import. Anything else fails to compile.
pub struct LineFrontend;

enum Line {
    Assign(String, String),
    Import(String),
    From(String, Vec<String>),
}

fn parse_line(line: &str) -> Result<Line, String> {
    if let Some(rest) = line.strip_prefix("from ") {
        let (module, names) = rest
            .split_once(" import ")
            .ok_or_else(|| format!("bad from-import: {line}"))?;
        let names = names.split(',').map(|n| n.trim().to_string()).collect();
        return Ok(Line::From(module.trim().to_string(), names));
    }
    if let Some(module) = line.strip_prefix("import ") {
        return Ok(Line::Import(module.trim().to_string()));
    }
    match line.split_once('=') {
        Some((name, value)) => Ok(Line::Assign(name.trim().to_string(), value.trim().to_string())),
        None => Err(format!("cannot compile line: {line}")),
    }
}

impl Frontend for LineFrontend {
    fn compile(&self, _path: &Path, text: &str) -> Result<Program, String> {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(parse_line)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Rc::new(move |rt: &mut Runtime| -> Result<(), RuntimeError> {
            for line in &lines {
                match line {
                    Line::Assign(name, value) => rt.set_global(name, Value::str(value)),
                    Line::Import(module) => rt.import(module, None)?,
                    Line::From(module, names) => rt.import(
                        module,
                        Some(pyhost_runtime::Selective::from_list(names.clone())),
                    )?,
                }
            }
            Ok(())
        }))
    }
}

/// A temporary project: `cwd/`, `home/lib/` and `base/`.
pub struct Project {
    pub dir: tempfile::TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["cwd", "home/lib", "base"] {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        Self { dir }
    }

    pub fn cwd(&self) -> PathBuf {
        self.dir.path().join("cwd")
    }

    pub fn home(&self) -> PathBuf {
        self.dir.path().join("home")
    }

    pub fn base(&self) -> PathBuf {
        self.dir.path().join("base")
    }

    pub fn write(&self, rel: &str, text: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, text).unwrap();
        path
    }

    pub fn config(&self) -> RuntimeConfig {
        RuntimeConfig {
            current_dir: Some(self.cwd()),
            install_dir: Some(self.home()),
            base_library_dir: Some(self.base()),
            ..RuntimeConfig::default()
        }
    }

    pub fn runtime(&self, frontend: impl Frontend + 'static) -> Runtime {
        let mut rt = Runtime::with_config(self.config());
        rt.set_frontend(Rc::new(frontend));
        rt.set_native_host(Box::new(ManifestHost::new()));
        rt
    }
}

pub fn global(rt: &Runtime, name: &str) -> Value {
    rt.get_global(name)
        .unwrap_or_else(|| panic!("global '{name}' is not bound"))
}

pub fn call_builtin(rt: &mut Runtime, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    let f = global(rt, name);
    rt.call(&f, args)
}

pub const GEO_MANIFEST: &str = r#"{
  "name": "Geo",
  "types": [
    { "namespace": "Geo", "name": "Point", "constructible": true,
      "fields": [ { "name": "x", "default": 0 }, { "name": "y", "default": 0 } ] },
    { "namespace": "Geo", "name": "Bag`1" },
    { "namespace": "Geo", "name": "Bag" },
    { "namespace": "Geo", "name": "Internal", "public": false },
    { "namespace": "Geo.Shapes", "name": "Circle" }
  ]
}"#;

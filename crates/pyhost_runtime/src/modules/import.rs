use std::path::Path;
use std::rc::Rc;

use pyhost_diagnostics::{DiagnosticKind, render_diagnostic};

use super::loader::{ModuleKind, ResolvedModule};
use crate::core::{Module, Value};
use crate::errors::RuntimeError;
use crate::native::NativeModule;
use crate::runtime::Runtime;

/// What an `import` binds besides the module itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selective {
    /// `from m import *`
    Wildcard,
    /// `from m import a, b`
    Names(Vec<String>),
}

impl Selective {
    /// Interprets an `__import__` fromlist; `["*"]` is the wildcard.
    pub fn from_list(names: Vec<String>) -> Self {
        if names.len() == 1 && names[0] == "*" {
            Selective::Wildcard
        } else {
            Selective::Names(names)
        }
    }
}

/// A loaded module of either kind, behind one view of its exported names.
pub enum LoadedModule {
    Source(Rc<Module>),
    Native(Rc<NativeModule>),
}

impl LoadedModule {
    pub fn name(&self) -> &str {
        match self {
            LoadedModule::Source(m) => &m.name,
            LoadedModule::Native(m) => &m.name,
        }
    }

    pub fn has(&self, name: &str) -> bool {
        match self {
            LoadedModule::Source(m) => m.globals.borrow().contains(name),
            LoadedModule::Native(m) => m.exported_type(name).is_some(),
        }
    }

    /// Native types are entered into the runtime's namespace tree on first
    /// lookup; the bound value is the tree's placeholder.
    pub fn lookup(&self, rt: &mut Runtime, name: &str) -> Option<Value> {
        match self {
            LoadedModule::Source(m) => m.globals.borrow().get(name).cloned(),
            LoadedModule::Native(m) => {
                let info = m.exported_type(name)?;
                Some(Value::NativeType(rt.namespaces.insert(info)))
            }
        }
    }

    /// Everything a wildcard import binds. For native modules this is every
    /// public type under its demangled name.
    pub fn exported(&self, rt: &mut Runtime) -> Vec<(String, Value)> {
        match self {
            LoadedModule::Source(m) => m.globals.borrow().entries(),
            LoadedModule::Native(m) => m
                .public_types()
                .map(|t| {
                    let placeholder = rt.namespaces.insert(t);
                    (t.simple_name().to_string(), Value::NativeType(placeholder))
                })
                .collect(),
        }
    }
}

impl Runtime {
    pub fn resolve_module(&self, name: &str) -> Result<ResolvedModule, RuntimeError> {
        self.module_loader.resolve(self, name)
    }

    /// `import name` (`selective == None`) or `from name import ...`.
    ///
    /// Results are written into the current context's globals. Nothing is
    /// bound unless every requested name exists.
    pub fn import(&mut self, name: &str, selective: Option<Selective>) -> Result<(), RuntimeError> {
        self.trace(|| format!("import: {}", name));
        let resolved = self.resolve_module(name)?;
        self.trace(|| format!("resolved: {} {}", resolved.tier, resolved.path.display()));
        let loaded = match resolved.kind {
            ModuleKind::Native => LoadedModule::Native(self.load_native(&resolved.path)?),
            ModuleKind::Source => LoadedModule::Source(self.load_source(name, &resolved.path)?),
        };
        self.bind_import(name, &loaded, selective.as_ref())?;
        self.trace(|| format!("import_done: {}", name));
        Ok(())
    }

    fn bind_import(
        &mut self,
        name: &str,
        loaded: &LoadedModule,
        selective: Option<&Selective>,
    ) -> Result<(), RuntimeError> {
        let globals = self.globals();
        match selective {
            None => match loaded {
                LoadedModule::Source(m) => {
                    globals.borrow_mut().insert(name, Value::Module(m.clone()));
                }
                LoadedModule::Native(m) => {
                    for (root, value) in self.enter_native_types(m) {
                        globals.borrow_mut().insert(&root, value);
                    }
                }
            },
            Some(Selective::Wildcard) => {
                let exported = loaded.exported(self);
                let mut g = globals.borrow_mut();
                for (k, v) in exported {
                    g.insert(k, v);
                }
            }
            Some(Selective::Names(names)) => {
                if let Some(missing) = names.iter().find(|n| !loaded.has(n)) {
                    return Err(self.error(DiagnosticKind::CannotImportName {
                        name: missing.clone(),
                        module: name.to_string(),
                    }));
                }
                let mut values = Vec::with_capacity(names.len());
                for n in names {
                    if let Some(v) = loaded.lookup(self, n) {
                        values.push((n.clone(), v));
                    }
                }
                let mut g = globals.borrow_mut();
                for (k, v) in values {
                    g.insert(k, v);
                }
            }
        }
        Ok(())
    }

    /// Runs the public types through the namespace tree and returns the
    /// top-level bindings they live under.
    fn enter_native_types(&mut self, module: &NativeModule) -> Vec<(String, Value)> {
        let mut tops: Vec<String> = Vec::new();
        for t in module.public_types() {
            self.namespaces.insert(t);
            let top = match t.namespace.split('.').find(|s| !s.is_empty()) {
                Some(seg) => seg.to_string(),
                None => t.simple_name().to_string(),
            };
            if !tops.contains(&top) {
                tops.push(top);
            }
        }
        let root = self.namespaces.root();
        tops.into_iter()
            .filter_map(|n| root.get(&n).map(|v| (n, v)))
            .collect()
    }

    fn load_native(&mut self, path: &Path) -> Result<Rc<NativeModule>, RuntimeError> {
        let loaded = self.native_host.load_module(&*self.caps.fs, path);
        let module = loaded.map_err(|reason| {
            self.error(DiagnosticKind::NativeLoadFailed {
                path: path.display().to_string(),
                reason,
            })
        })?;
        for d in &module.diagnostics {
            self.trace(|| render_diagnostic(d));
        }
        Ok(module)
    }

    fn load_source(&mut self, name: &str, path: &Path) -> Result<Rc<Module>, RuntimeError> {
        let key = self
            .caps
            .fs
            .canonicalize(path)
            .unwrap_or_else(|_| path.to_path_buf())
            .display()
            .to_string();
        if let Some(pos) = self.import_stack.iter().position(|(k, _)| *k == key) {
            let mut chain: Vec<String> = self.import_stack[pos..]
                .iter()
                .map(|(_, n)| n.clone())
                .collect();
            chain.push(name.to_string());
            return Err(self.error(DiagnosticKind::CircularImport(chain)));
        }
        self.import_stack.push((key, name.to_string()));
        let result = self.run_source_module(name, path);
        self.import_stack.pop();
        result
    }

    fn run_source_module(&mut self, name: &str, path: &Path) -> Result<Rc<Module>, RuntimeError> {
        let (text, stamp) = self.module_loader.load_text_and_stamp(self, path)?;
        self.trace(|| format!("source: {} ({} bytes)", path.display(), stamp.len));
        let Some(frontend) = self.frontend.clone() else {
            return Err(self.error(DiagnosticKind::FrontendMissing(path.display().to_string())));
        };
        let program = frontend.compile(path, &text).map_err(|reason| {
            self.error(DiagnosticKind::CompileFailed {
                path: path.display().to_string(),
                reason,
            })
        })?;
        let globals = self.exec_program(name, Some(path), &program)?;
        Ok(Rc::new(Module {
            name: name.to_string(),
            path: path.to_path_buf(),
            globals,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_fromlist_is_the_wildcard() {
        assert_eq!(Selective::from_list(vec!["*".into()]), Selective::Wildcard);
        assert_eq!(
            Selective::from_list(vec!["a".into(), "*".into()]),
            Selective::Names(vec!["a".into(), "*".into()])
        );
    }
}

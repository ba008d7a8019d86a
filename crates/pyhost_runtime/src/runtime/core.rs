use std::path::{Path, PathBuf};
use std::rc::Rc;

use pyhost_core::Capabilities;
use pyhost_diagnostics::DiagnosticKind;

use super::config::{ExecResult, RuntimeConfig};
use crate::builtins_registry::{BuiltinProvider, BuiltinRegistry, StdBuiltinProvider};
use crate::core::{
    ContextStack, ExecutionContext, Function, MemberTable, SharedMembers, TypeDescriptor, Value,
};
use crate::errors::RuntimeError;
use crate::modules::{self, Frontend, Program};
use crate::native::{ExtensionRegistry, HostTypes, ManifestHost, NamespaceTree, NativeHost};
use crate::object::bootstrap::{CoreTypes, DefaultHooks};

/// Name of the context a runtime starts with.
pub const MAIN_CONTEXT: &str = "__main__";

pub struct Runtime {
    pub(crate) config: RuntimeConfig,
    pub(crate) caps: Capabilities,
    pub(crate) contexts: ContextStack,
    /// Template every fresh context's globals start from.
    pub(crate) builtins: MemberTable,
    pub(crate) extensions: ExtensionRegistry,
    pub(crate) namespaces: NamespaceTree,
    pub(crate) module_loader: Box<dyn modules::ModuleLoader>,
    pub(crate) native_host: Box<dyn NativeHost>,
    pub(crate) frontend: Option<Rc<dyn Frontend>>,
    /// Source modules being executed, as `(canonical path, import name)`.
    pub(crate) import_stack: Vec<(String, String)>,
    pub(crate) output: String,
    /// Containers whose repr is in progress; a re-entry renders as `[...]`.
    pub(crate) rendering: Vec<*const ()>,
    pub(crate) types: CoreTypes,
    pub(crate) hooks: DefaultHooks,
    pub(crate) host_types: HostTypes,
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        let (types, hooks) = crate::object::bootstrap::bootstrap_types();
        let mut rt = Self {
            config,
            caps: Capabilities::default(),
            contexts: ContextStack::new(),
            builtins: MemberTable::new(),
            extensions: ExtensionRegistry::new(),
            namespaces: NamespaceTree::new(),
            module_loader: Box::new(modules::StdModuleLoader),
            native_host: Box::new(ManifestHost::new()),
            frontend: None,
            import_stack: Vec::new(),
            output: String::new(),
            rendering: Vec::new(),
            types,
            hooks,
            host_types: HostTypes::new(),
        };
        rt.install_builtins();
        let main = ExecutionContext::new(MAIN_CONTEXT, None, rt.builtins.clone());
        rt.contexts.push(main);
        rt
    }

    fn install_builtins(&mut self) {
        let mut registry = BuiltinRegistry::new();
        StdBuiltinProvider.install(&mut registry);
        registry.install_into(self);
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn set_frontend(&mut self, frontend: Rc<dyn Frontend>) {
        self.frontend = Some(frontend);
    }

    pub fn set_native_host(&mut self, host: Box<dyn NativeHost>) {
        self.native_host = host;
    }

    pub fn set_module_loader(&mut self, loader: Box<dyn modules::ModuleLoader>) {
        self.module_loader = loader;
    }

    pub fn set_capabilities(&mut self, caps: Capabilities) {
        self.caps = caps;
    }

    pub(crate) fn fs(&self) -> &dyn pyhost_core::FileSystem {
        &*self.caps.fs
    }

    pub fn current_dir(&self) -> PathBuf {
        self.config.resolved_current_dir()
    }

    pub fn install_dir(&self) -> Option<PathBuf> {
        self.config.resolved_install_dir()
    }

    pub fn base_library_dir(&self) -> Option<PathBuf> {
        self.config
            .base_library_dir
            .clone()
            .or_else(|| self.native_host.base_library_dir())
    }

    pub fn error(&self, kind: DiagnosticKind) -> RuntimeError {
        RuntimeError::from_kind(&kind)
    }

    pub(crate) fn trace(&self, line: impl FnOnce() -> String) {
        if self.config.trace_imports {
            eprintln!("{}", line());
        }
    }

    /// Globals of the innermost execution context.
    pub fn globals(&self) -> SharedMembers {
        match self.contexts.top() {
            Some(ctx) => ctx.globals.clone(),
            None => Rc::new(std::cell::RefCell::new(self.builtins.clone())),
        }
    }

    pub fn context_name(&self) -> String {
        self.contexts
            .top()
            .map(|c| c.name.clone())
            .unwrap_or_else(|| MAIN_CONTEXT.to_string())
    }

    pub fn get_global(&self, name: &str) -> Option<Value> {
        self.contexts
            .top()
            .and_then(|c| c.globals.borrow().get(name).cloned())
    }

    pub fn set_global(&mut self, name: &str, value: Value) {
        if let Some(ctx) = self.contexts.top() {
            ctx.globals.borrow_mut().insert(name, value);
        }
    }

    pub fn object_type(&self) -> Rc<TypeDescriptor> {
        self.types.object.clone()
    }

    /// Runs `program` in a fresh context named `name` and returns that
    /// context's globals. The context is popped even when the program fails.
    pub fn exec_program(
        &mut self,
        name: &str,
        path: Option<&Path>,
        program: &Program,
    ) -> Result<SharedMembers, RuntimeError> {
        let ctx = ExecutionContext::new(name, path.map(Path::to_path_buf), self.builtins.clone());
        let globals = ctx.globals.clone();
        self.contexts.push(ctx);
        let result = program(self);
        self.contexts.pop();
        result.map(|_| globals)
    }

    /// Runs `program` in the main context and drains the collected output.
    pub fn exec_main(&mut self, program: &Program) -> Result<ExecResult, RuntimeError> {
        program(self)?;
        Ok(ExecResult {
            output: std::mem::take(&mut self.output),
        })
    }

    pub(crate) fn write_output(&mut self, text: &str) {
        if self.config.echo_output {
            print!("{}", text);
        }
        self.output.push_str(text);
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    pub fn namespaces(&self) -> &NamespaceTree {
        &self.namespaces
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

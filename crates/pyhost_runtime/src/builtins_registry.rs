use std::rc::Rc;

use pyhost_core::{HostTypeId, builtin_types};

use crate::builtins;
use crate::core::{Function, Value};
use crate::errors::RuntimeError;
use crate::runtime::Runtime;

pub type BuiltinFn = fn(&mut Runtime, &[Value]) -> Result<Value, RuntimeError>;

pub struct BuiltinRegistry {
    entries: Vec<(String, BuiltinFn)>,
    extensions: Vec<(&'static str, String, BuiltinFn)>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            extensions: Vec::new(),
        }
    }

    pub fn register(&mut self, name: &str, fun: BuiltinFn) {
        self.entries.push((name.to_string(), fun));
    }

    /// Registers `fun` as method `name` of the host type `host_type`.
    pub fn register_extension(&mut self, host_type: &'static str, name: &str, fun: BuiltinFn) {
        self.extensions.push((host_type, name.to_string(), fun));
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Binds the core and host type names, then every registered function,
    /// into the runtime's builtins template and extension registry.
    pub fn install_into(self, rt: &mut Runtime) {
        let types = [
            ("object", &rt.types.object),
            ("type", &rt.types.type_),
            ("function", &rt.types.function),
            ("Namespace", &rt.types.namespace),
        ];
        for (name, ty) in types {
            rt.builtins.insert(name, Value::Type(ty.clone()));
        }
        for ty in rt.host_types.named() {
            rt.builtins.insert(ty.name.clone(), Value::NativeType(ty.clone()));
        }
        for (name, fun) in self.entries {
            let f = Function::new(&name, Rc::new(fun));
            rt.builtins.insert(name, Value::function(f));
        }
        for (host_type, name, fun) in self.extensions {
            let f = Rc::new(Function::new(&name, Rc::new(fun)));
            rt.extensions.register(HostTypeId::new(host_type), &name, f);
        }
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub trait BuiltinProvider {
    fn install(&self, registry: &mut BuiltinRegistry);
}

pub struct StdBuiltinProvider;

impl BuiltinProvider for StdBuiltinProvider {
    fn install(&self, registry: &mut BuiltinRegistry) {
        registry.register("print", builtins::builtin_print);
        registry.register("repr", builtins::builtin_repr);
        registry.register("len", builtins::builtin_len);
        registry.register("max", builtins::builtin_max);
        registry.register("min", builtins::builtin_min);
        registry.register("slice", builtins::builtin_slice);
        registry.register("iter", builtins::builtin_iter);
        registry.register("next", builtins::builtin_next);
        registry.register("isinstance", builtins::builtin_isinstance);
        registry.register("issubclass", builtins::builtin_issubclass);
        registry.register("globals", builtins::builtin_globals);
        registry.register("staticmethod", builtins::builtin_staticmethod);
        registry.register("extension", builtins::builtin_extension);
        registry.register("super", builtins::builtin_super);
        registry.register("getattr", builtins::builtin_getattr);
        registry.register("setattr", builtins::builtin_setattr);
        registry.register("delattr", builtins::builtin_delattr);
        registry.register("hasattr", builtins::builtin_hasattr);
        registry.register("using", builtins::builtin_using);
        registry.register("typeof", builtins::builtin_typeof);
        registry.register("__import__", builtins::builtin_import);
        // str
        registry.register_extension(builtin_types::STR, "replace", builtins::str_replace);
        registry.register_extension(builtin_types::STR, "join", builtins::str_join);
        registry.register_extension(builtin_types::STR, "split", builtins::str_split);
        registry.register_extension(builtin_types::STR, "__new__", builtins::str_new);
        // list
        registry.register_extension(builtin_types::LIST, "append", builtins::list_append);
        // rendering
        for host_type in [
            builtin_types::LIST,
            builtin_types::TUPLE,
            builtin_types::DICT,
            builtin_types::SET,
        ] {
            registry.register_extension(host_type, "__str__", builtins::container_str);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_provider_registers_core_builtins() {
        let mut registry = BuiltinRegistry::new();
        StdBuiltinProvider.install(&mut registry);
        let names = registry.names();
        for n in ["print", "len", "super", "extension", "__import__"] {
            assert!(names.iter().any(|x| x == n), "missing {n}");
        }
    }

    #[test]
    fn install_binds_type_names_and_extensions() {
        let rt = Runtime::new();
        assert!(rt.builtins.contains("object"));
        assert!(rt.builtins.contains("dict"));
        assert!(!rt.builtins.contains("iterator"));
        let str_id = HostTypeId::new(builtin_types::STR);
        assert_eq!(
            rt.extensions().names_for(&str_id),
            vec!["__new__", "join", "replace", "split"]
        );
    }
}

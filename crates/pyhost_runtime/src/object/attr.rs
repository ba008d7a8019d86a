//! Attribute resolution: `obj.name` reads, writes and deletes.
//!
//! Instances resolve in a fixed order: an overriding `__getattribute__`,
//! then the instance's own table, then the immediate type's table (binding
//! non-static functions), then `__getattr__`. Types read only their own
//! table. Host values go to intrinsic members and then the extension
//! registry.

use std::rc::Rc;

use pyhost_diagnostics::{DiagnosticKind, find_best_match};

use crate::core::{BoundMethod, Instance, TypeDescriptor, Value};
use crate::errors::RuntimeError;
use crate::runtime::Runtime;

impl Runtime {
    pub fn get_attr(&mut self, target: &Value, name: &str) -> Result<Value, RuntimeError> {
        match target {
            Value::Instance(inst) => self.instance_get_attr(inst, name),
            Value::Type(ty) => self.type_get_attr(ty, name),
            Value::Module(m) => {
                let found = m.globals.borrow().get(name).cloned();
                match found {
                    Some(v) => Ok(v),
                    None if name == "__name__" => Ok(Value::str(&m.name)),
                    None => Err(self.error(DiagnosticKind::MissingModuleAttribute {
                        module: m.name.clone(),
                        name: name.to_string(),
                    })),
                }
            }
            Value::Namespace(ns) => ns.get(name).ok_or_else(|| {
                self.error(DiagnosticKind::MissingNamespaceMember {
                    path: ns.path.clone(),
                    name: name.to_string(),
                })
            }),
            Value::Function(f) => match name {
                "__name__" => Ok(Value::str(&f.name)),
                _ => self.callable_get_attr(target, name),
            },
            Value::BoundMethod(m) => match name {
                "__self__" => Ok(m.receiver.clone()),
                "__func__" => Ok(Value::Function(m.function.clone())),
                "__name__" => Ok(Value::str(&m.function.name)),
                _ => self.callable_get_attr(target, name),
            },
            Value::NativeType(ty) => self.native_type_get_attr(ty, name),
            Value::NativeMethod(m) => match name {
                "__name__" => Ok(Value::str(m.kind.name())),
                _ => Err(self.error(DiagnosticKind::NativeMissingAttribute {
                    ty: target.type_name(),
                    name: name.to_string(),
                })),
            },
            _ => self.host_get_attr(target, name),
        }
    }

    /// Members of the bootstrap `function` type, bound to the callable.
    fn callable_get_attr(&mut self, target: &Value, name: &str) -> Result<Value, RuntimeError> {
        match self.types.function.get(name) {
            Some(Value::Function(f)) => Ok(Value::BoundMethod(Rc::new(BoundMethod {
                receiver: target.clone(),
                function: f,
            }))),
            Some(other) => Ok(other),
            None => Err(self.error(DiagnosticKind::MissingAttribute {
                ty: target.type_name(),
                name: name.to_string(),
                suggestion: None,
            })),
        }
    }

    fn instance_get_attr(&mut self, inst: &Rc<Instance>, name: &str) -> Result<Value, RuntimeError> {
        let ty = inst.ty();
        let hook = ty.get("__getattribute__");
        match hook {
            Some(Value::Function(f)) if self.hooks.is_default(&f) => {
                self.default_getattribute(inst, name)
            }
            Some(hook) => {
                let args = [Value::Instance(inst.clone()), Value::str(name)];
                self.call(&hook, &args)
            }
            None => self.default_getattribute(inst, name),
        }
    }

    /// The built-in instance lookup behind `object.__getattribute__`.
    pub(crate) fn default_getattribute(
        &mut self,
        inst: &Rc<Instance>,
        name: &str,
    ) -> Result<Value, RuntimeError> {
        if let Some(v) = inst.get_own(name) {
            return Ok(v);
        }
        let ty = inst.ty();
        match ty.get(name) {
            Some(Value::Function(f)) if !f.is_static() => {
                return Ok(Value::BoundMethod(Rc::new(BoundMethod {
                    receiver: Value::Instance(inst.clone()),
                    function: f,
                })));
            }
            Some(v) => return Ok(v),
            None => {}
        }
        if let Some(hook) = ty.get("__getattr__") {
            let args = [Value::Instance(inst.clone()), Value::str(name)];
            return self.call(&hook, &args);
        }
        let suggestion = {
            let own = inst.members.borrow();
            let members = ty.members.borrow();
            find_best_match(name, own.keys().chain(members.keys())).map(str::to_string)
        };
        Err(self.error(DiagnosticKind::MissingAttribute {
            ty: ty.name.clone(),
            name: name.to_string(),
            suggestion,
        }))
    }

    /// Own table only: no base walk and no binding.
    fn type_get_attr(&mut self, ty: &Rc<TypeDescriptor>, name: &str) -> Result<Value, RuntimeError> {
        ty.get(name).ok_or_else(|| {
            self.error(DiagnosticKind::MissingTypeAttribute {
                ty: ty.name.clone(),
                name: name.to_string(),
            })
        })
    }

    pub fn set_attr(&mut self, target: &Value, name: &str, value: Value) -> Result<(), RuntimeError> {
        match target {
            Value::Instance(inst) => {
                let hook = inst.ty().get("__setattr__");
                match hook {
                    Some(Value::Function(f)) if self.hooks.is_default(&f) => {}
                    Some(hook) => {
                        let args = [target.clone(), Value::str(name), value];
                        self.call(&hook, &args)?;
                        return Ok(());
                    }
                    None => {}
                }
                self.store_instance_attr(inst, name, value)
            }
            Value::Type(ty) => {
                ty.members.borrow_mut().insert(name, value);
                Ok(())
            }
            Value::Module(m) => {
                m.globals.borrow_mut().insert(name, value);
                Ok(())
            }
            Value::Namespace(ns) => {
                ns.members.borrow_mut().insert(name, value);
                Ok(())
            }
            Value::NativeObject(obj) => {
                let mut fields = obj.fields.borrow_mut();
                if !fields.contains(name) {
                    return Err(self.error(DiagnosticKind::NativeMissingAttribute {
                        ty: obj.ty.name.clone(),
                        name: name.to_string(),
                    }));
                }
                fields.insert(name, value);
                Ok(())
            }
            _ => Err(self.error(DiagnosticKind::NativeMissingAttribute {
                ty: target.type_name(),
                name: name.to_string(),
            })),
        }
    }

    /// Writes into an instance's own table. `__class__` also retargets the
    /// instance's type, so later lookups go through the new class.
    pub(crate) fn store_instance_attr(
        &self,
        inst: &Rc<Instance>,
        name: &str,
        value: Value,
    ) -> Result<(), RuntimeError> {
        if name == "__class__" {
            let Value::Type(ty) = &value else {
                return Err(self.error(DiagnosticKind::TypeMismatch {
                    expected: "class for __class__".into(),
                    actual: value.type_name(),
                }));
            };
            inst.set_ty(ty.clone());
        }
        inst.members.borrow_mut().insert(name, value);
        Ok(())
    }

    /// Removes `name` from the target's own table. A missing key is not an
    /// error.
    pub fn del_attr(&mut self, target: &Value, name: &str) -> Result<(), RuntimeError> {
        match target {
            Value::Instance(inst) => {
                let hook = inst.ty().get("__delattr__");
                match hook {
                    Some(Value::Function(f)) if self.hooks.is_default(&f) => {}
                    Some(hook) => {
                        let args = [target.clone(), Value::str(name)];
                        self.call(&hook, &args)?;
                        return Ok(());
                    }
                    None => {}
                }
                inst.members.borrow_mut().remove(name);
                Ok(())
            }
            Value::Type(ty) => {
                ty.members.borrow_mut().remove(name);
                Ok(())
            }
            Value::Module(m) => {
                m.globals.borrow_mut().remove(name);
                Ok(())
            }
            Value::Namespace(ns) => {
                ns.members.borrow_mut().remove(name);
                Ok(())
            }
            _ => Err(self.error(DiagnosticKind::NativeMissingAttribute {
                ty: target.type_name(),
                name: name.to_string(),
            })),
        }
    }

    /// `hasattr` semantics: only attribute misses count as absent.
    pub fn has_attr(&mut self, target: &Value, name: &str) -> Result<bool, RuntimeError> {
        match self.get_attr(target, name) {
            Ok(_) => Ok(true),
            Err(e) if is_attribute_miss(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

pub(crate) fn is_attribute_miss(e: &RuntimeError) -> bool {
    use pyhost_diagnostics::ExceptionClass;
    e.is_a(ExceptionClass::AttributeError) || e.class == ExceptionClass::LookupError
}

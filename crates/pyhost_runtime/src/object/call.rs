use std::rc::Rc;

use pyhost_diagnostics::DiagnosticKind;
use smallvec::SmallVec;

use crate::core::{Function, TypeDescriptor, Value};
use crate::errors::RuntimeError;
use crate::runtime::Runtime;

impl Runtime {
    pub fn call(&mut self, callee: &Value, args: &[Value]) -> Result<Value, RuntimeError> {
        match callee {
            Value::Function(f) => self.call_function(f, args),
            Value::BoundMethod(m) => {
                let mut full: SmallVec<[Value; 4]> = SmallVec::with_capacity(args.len() + 1);
                full.push(m.receiver.clone());
                full.extend(args.iter().cloned());
                self.call_function(&m.function, &full)
            }
            Value::Type(ty) => self.construct(ty, args),
            Value::Instance(_) => {
                let hook = match self.get_attr(callee, "__call__") {
                    Ok(h) => h,
                    Err(e) if crate::object::attr::is_attribute_miss(&e) => {
                        return Err(self.error(DiagnosticKind::NotCallable(callee.type_name())));
                    }
                    Err(e) => return Err(e),
                };
                self.call(&hook, args)
            }
            Value::NativeType(ty) => self.construct_native(ty, args),
            Value::NativeMethod(m) => {
                crate::methods::dispatch_builtin_method(self, &m.receiver, m.kind, args)
            }
            _ => Err(self.error(DiagnosticKind::NotCallable(callee.type_name()))),
        }
    }

    pub fn call_function(&mut self, f: &Rc<Function>, args: &[Value]) -> Result<Value, RuntimeError> {
        let handler = f.handler.clone();
        handler(self, args)
    }

    /// `__new__(cls, *args)`, then `__init__(inst, *args)` when the result is
    /// an instance of exactly `ty`.
    fn construct(&mut self, ty: &Rc<TypeDescriptor>, args: &[Value]) -> Result<Value, RuntimeError> {
        if Rc::ptr_eq(ty, &self.types.type_) && args.len() == 1 {
            return Ok(self.type_of(&args[0]));
        }
        let Some(new) = ty.get("__new__") else {
            return Err(self.error(DiagnosticKind::NoConstructor(ty.name.clone())));
        };
        let mut full: SmallVec<[Value; 4]> = SmallVec::with_capacity(args.len() + 1);
        full.push(Value::Type(ty.clone()));
        full.extend(args.iter().cloned());
        let obj = self.call(&new, &full)?;

        let exact = match &obj {
            Value::Instance(inst) => Rc::ptr_eq(&inst.ty(), ty),
            _ => false,
        };
        if exact {
            if let Some(init) = ty.get("__init__") {
                full[0] = obj.clone();
                self.call(&init, &full)?;
            }
        }
        Ok(obj)
    }

    /// What `type(x)` answers.
    pub fn type_of(&self, value: &Value) -> Value {
        match value {
            Value::Instance(inst) => Value::Type(inst.ty()),
            Value::Type(_) => Value::Type(self.types.type_.clone()),
            Value::Function(_) | Value::BoundMethod(_) => Value::Type(self.types.function.clone()),
            Value::Namespace(_) => Value::Type(self.types.namespace.clone()),
            Value::NativeType(_) | Value::Module(_) => Value::Type(self.types.type_.clone()),
            other => match self.native_type_of(other) {
                Some(t) => Value::NativeType(t),
                None => Value::Type(self.types.object.clone()),
            },
        }
    }
}

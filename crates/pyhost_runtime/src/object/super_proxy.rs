//! Cooperative `super()`.

use std::rc::Rc;

use pyhost_diagnostics::DiagnosticKind;

use crate::core::{Instance, TypeDescriptor, Value};
use crate::errors::RuntimeError;
use crate::runtime::Runtime;

impl Runtime {
    /// Proxy viewing `instance` through the last declared base of `subclass`
    /// (the instance's own type when `None`).
    ///
    /// The proxy shares the instance's member table, so writes made through
    /// it land on the instance. A fresh proxy is built on every call.
    pub fn super_proxy(
        &self,
        subclass: Option<&Rc<TypeDescriptor>>,
        instance: &Value,
    ) -> Result<Value, RuntimeError> {
        let Value::Instance(inst) = instance else {
            return Err(self.error(DiagnosticKind::SuperRequiresInstance(instance.type_name())));
        };
        let subclass = match subclass {
            Some(t) => t.clone(),
            None => inst.ty(),
        };
        let Some(parent) = subclass.last_base() else {
            return Err(self.error(DiagnosticKind::NoBaseForSuper(subclass.name.clone())));
        };
        Ok(Value::Instance(Rc::new(Instance::with_members(
            parent.clone(),
            inst.members.clone(),
        ))))
    }
}

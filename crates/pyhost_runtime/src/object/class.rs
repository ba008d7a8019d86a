use std::rc::Rc;

use crate::core::{MemberTable, TypeDescriptor, Value};
use crate::runtime::Runtime;

/// Per-class entries that are never inherited.
const OWN_ONLY: [&str; 4] = ["__name__", "__bases__", "__module__", "__class__"];

impl Runtime {
    /// Creates a class. `bases` defaults to `[object]`.
    ///
    /// Base members are flattened into the new table at creation time: the
    /// class's own members win, and among bases the earlier one wins. Lookups
    /// later consult only this table.
    pub fn create_class(
        &mut self,
        name: &str,
        bases: Vec<Rc<TypeDescriptor>>,
        members: MemberTable,
    ) -> Rc<TypeDescriptor> {
        let bases = if bases.is_empty() {
            vec![self.types.object.clone()]
        } else {
            bases
        };
        let mut table = members;
        for base in &bases {
            for (key, value) in base.members.borrow().iter() {
                if OWN_ONLY.contains(&key) {
                    continue;
                }
                table.insert_if_absent(key, value.clone());
            }
        }
        table.insert("__name__", Value::str(name));
        table.insert(
            "__bases__",
            Value::tuple(bases.iter().map(|b| Value::Type(b.clone())).collect()),
        );
        table.insert("__module__", Value::str(&self.context_name()));
        table.insert("__class__", Value::Type(self.types.type_.clone()));
        Rc::new(TypeDescriptor::new(name, bases, table))
    }

    /// Creates a class and binds it in the current globals.
    pub fn define_class(
        &mut self,
        name: &str,
        bases: Vec<Rc<TypeDescriptor>>,
        members: MemberTable,
    ) -> Rc<TypeDescriptor> {
        let ty = self.create_class(name, bases, members);
        self.set_global(name, Value::Type(ty.clone()));
        ty
    }
}

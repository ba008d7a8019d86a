use std::rc::Rc;

use super::members::{MemberTable, SharedMembers};
use super::value::Value;

/// A language-level class.
///
/// `bases` is empty only for the root type `object`. Members are filled once
/// at class creation; later writes go straight into the table.
pub struct TypeDescriptor {
    pub name: String,
    pub bases: Vec<Rc<TypeDescriptor>>,
    pub members: SharedMembers,
}

impl TypeDescriptor {
    pub fn new(name: &str, bases: Vec<Rc<TypeDescriptor>>, members: MemberTable) -> Self {
        Self {
            name: name.to_string(),
            bases,
            members: Rc::new(std::cell::RefCell::new(members)),
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.members.borrow().get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.members.borrow().contains(name)
    }

    pub fn is_subclass_of(self: &Rc<Self>, other: &Rc<TypeDescriptor>) -> bool {
        if Rc::ptr_eq(self, other) {
            return true;
        }
        self.bases.iter().any(|b| b.is_subclass_of(other))
    }

    /// Last declared base; what `super()` resolves against.
    pub fn last_base(&self) -> Option<&Rc<TypeDescriptor>> {
        self.bases.last()
    }
}

impl std::fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field(
                "bases",
                &self.bases.iter().map(|b| b.name.as_str()).collect::<Vec<_>>(),
            )
            .field("members", &*self.members.borrow())
            .finish()
    }
}

//! Member tables: the name -> value stores behind instances, types,
//! namespaces and module scopes.

use std::cell::RefCell;
use std::rc::Rc;

use pyhost_core::{FastIndexMap, fast_index_map_new};

use super::value::Value;

/// Shared handle to a member table. A table has one owner; the only second
/// holder is a `super()` proxy viewing its instance's state.
pub type SharedMembers = Rc<RefCell<MemberTable>>;

#[derive(Clone, Default)]
pub struct MemberTable {
    map: FastIndexMap<String, Value>,
}

impl MemberTable {
    pub fn new() -> Self {
        Self {
            map: fast_index_map_new(),
        }
    }

    pub fn shared() -> SharedMembers {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn from_entries<I: IntoIterator<Item = (String, Value)>>(entries: I) -> Self {
        let mut t = Self::new();
        for (k, v) in entries {
            t.insert(k, v);
        }
        t
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.map.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.map.insert(name.into(), value)
    }

    /// Inserts only when `name` is absent; returns whether it inserted.
    pub fn insert_if_absent(&mut self, name: &str, value: Value) -> bool {
        if self.map.contains_key(name) {
            return false;
        }
        self.map.insert(name.to_string(), value);
        true
    }

    /// Keeps the relative order of the remaining entries.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.map.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn entries(&self) -> Vec<(String, Value)> {
        self.map
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl std::fmt::Debug for MemberTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.map.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order_across_removal() {
        let mut t = MemberTable::new();
        t.insert("a", Value::Int(1));
        t.insert("b", Value::Int(2));
        t.insert("c", Value::Int(3));
        t.remove("b");
        t.insert("d", Value::Int(4));
        assert_eq!(t.keys().collect::<Vec<_>>(), vec!["a", "c", "d"]);
    }

    #[test]
    fn insert_if_absent_does_not_overwrite() {
        let mut t = MemberTable::new();
        assert!(t.insert_if_absent("x", Value::Int(1)));
        assert!(!t.insert_if_absent("x", Value::Int(2)));
        assert_eq!(t.get("x"), Some(&Value::Int(1)));
    }
}

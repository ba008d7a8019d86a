//! Language-level methods attached to host types after the fact.

use std::hash::BuildHasher;
use std::rc::Rc;

use pyhost_core::{FastHashMap, HostTypeId, fast_map_new};

use crate::core::Function;

/// Keyed by `(host type, method name)`. Lookups are exact: no base-type
/// fallback. Registering an existing key replaces the earlier function.
pub struct ExtensionRegistry {
    map: FastHashMap<(HostTypeId, String), Rc<Function>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self { map: fast_map_new() }
    }

    /// Returns the function previously registered under the key, if any.
    pub fn register(
        &mut self,
        ty: HostTypeId,
        name: &str,
        function: Rc<Function>,
    ) -> Option<Rc<Function>> {
        self.map.insert((ty, name.to_string()), function)
    }

    pub fn lookup(&self, ty: &HostTypeId, name: &str) -> Option<Rc<Function>> {
        let hash = self.map.hasher().hash_one((ty, name));
        self.map
            .raw_entry()
            .from_hash(hash, |(k_ty, k_name)| k_ty == ty && k_name == name)
            .map(|(_, f)| f.clone())
    }

    pub fn contains(&self, ty: &HostTypeId, name: &str) -> bool {
        self.lookup(ty, name).is_some()
    }

    /// Sorted method names registered for `ty`.
    pub fn names_for(&self, ty: &HostTypeId) -> Vec<String> {
        let mut names: Vec<String> = self
            .map
            .keys()
            .filter(|(k_ty, _)| k_ty == ty)
            .map(|(_, n)| n.clone())
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//! Hash map aliases with a deterministic hasher.

use ahash::RandomState;
use hashbrown::HashMap;
use indexmap::{IndexMap, IndexSet};
use std::hash::Hash;

pub type FastHashMap<K, V> = HashMap<K, V, RandomState>;

/// Insertion-ordered map; iteration order is the order keys were first inserted.
pub type FastIndexMap<K, V> = IndexMap<K, V, RandomState>;

pub type FastIndexSet<K> = IndexSet<K, RandomState>;

pub fn fast_hasher() -> RandomState {
    RandomState::with_seeds(0, 0, 0, 0)
}

pub fn fast_map_new<K: Eq + Hash, V>() -> FastHashMap<K, V> {
    HashMap::with_hasher(fast_hasher())
}

pub fn fast_index_map_new<K: Eq + Hash, V>() -> FastIndexMap<K, V> {
    IndexMap::with_hasher(fast_hasher())
}

pub fn fast_index_set_new<K: Eq + Hash>() -> FastIndexSet<K> {
    IndexSet::with_hasher(fast_hasher())
}

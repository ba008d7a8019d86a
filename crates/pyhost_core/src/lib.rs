//! Core types for the pyhost runtime.
//!
//! This crate holds the pieces that do not depend on the interpreter:
//! - `FastHashMap` / `FastIndexMap` - hash maps with a fixed-seed ahash hasher
//! - `NativeTypeInfo`, `NativeModuleManifest` - native library type metadata
//! - `HostTypeId` - identity of a native (host) type
//! - `Capabilities` - file system access used by the module resolver

pub mod capabilities;
pub mod map;
pub mod metadata;

pub use capabilities::{Capabilities, FileStat, FileSystem, StdFileSystem};
pub use map::{
    FastHashMap, FastIndexMap, FastIndexSet, fast_index_map_new, fast_index_set_new, fast_map_new,
};
pub use metadata::{
    FieldSpec, HostTypeId, Mangled, NativeModuleManifest, NativeTypeInfo, split_arity,
    builtin_types,
};

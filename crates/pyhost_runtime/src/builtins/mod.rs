pub(crate) mod collection;
pub(crate) mod common;
pub(crate) mod conversion;
pub(crate) mod core;

pub use collection::*;
pub use conversion::{
    builtin_repr, container_str, list_append, str_join, str_new, str_replace, str_split,
};
pub use self::core::*;

//! The bridge to host (native) types: module loading, namespace trees,
//! extension methods and host member access.

mod extensions;
mod host;
mod members;
mod namespace;

pub use extensions::ExtensionRegistry;
pub use host::{ManifestHost, NativeHost, NativeModule, parse_manifest};
pub use members::{HostTypes, json_to_value};
pub use namespace::{NamespaceSnapshot, NamespaceTree, normalize_path};

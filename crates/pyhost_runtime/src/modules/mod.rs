//! Module resolution and the `import` operation.

mod frontend;
mod import;
mod loader;

pub use frontend::{Frontend, Program};
pub use import::{LoadedModule, Selective};
pub use loader::{
    ImportStamp, ModuleKind, ModuleLoader, ResolvedModule, SearchTier, StdModuleLoader, candidates,
};

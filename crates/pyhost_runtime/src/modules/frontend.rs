use std::path::Path;
use std::rc::Rc;

use crate::errors::RuntimeError;
use crate::runtime::Runtime;

/// A compiled source module: runs against the runtime's current context.
pub type Program = Rc<dyn Fn(&mut Runtime) -> Result<(), RuntimeError>>;

/// Turns source text into a [`Program`]. The runtime itself never parses.
pub trait Frontend {
    fn compile(&self, path: &Path, text: &str) -> Result<Program, String>;
}

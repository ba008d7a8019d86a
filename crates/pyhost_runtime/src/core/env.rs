use std::path::PathBuf;

use super::members::{MemberTable, SharedMembers};

/// One running program or module: a name and its global scope.
#[derive(Clone, Debug)]
pub struct ExecutionContext {
    pub name: String,
    pub path: Option<PathBuf>,
    pub globals: SharedMembers,
}

impl ExecutionContext {
    pub fn new(name: &str, path: Option<PathBuf>, globals: MemberTable) -> Self {
        Self {
            name: name.to_string(),
            path,
            globals: std::rc::Rc::new(std::cell::RefCell::new(globals)),
        }
    }
}

/// Stack of execution contexts; the top is the scope `import` writes into.
#[derive(Debug, Default)]
pub struct ContextStack {
    frames: Vec<ExecutionContext>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn push(&mut self, ctx: ExecutionContext) {
        self.frames.push(ctx);
    }

    pub fn pop(&mut self) -> Option<ExecutionContext> {
        self.frames.pop()
    }

    pub fn top(&self) -> Option<&ExecutionContext> {
        self.frames.last()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

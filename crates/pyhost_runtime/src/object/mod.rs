//! The dynamic object model: attribute resolution, `super`, calls and the
//! value protocols built on them.

pub(crate) mod attr;
pub(crate) mod bootstrap;
mod call;
mod class;
mod ops;
mod super_proxy;

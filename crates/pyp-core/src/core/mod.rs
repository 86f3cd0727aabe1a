//! Command plumbing for pyp: configuration, process effects, environment
//! activation, the manifest store, and the pip executor.

pub(crate) mod config;
pub(crate) mod env;
pub(crate) mod errors;
pub(crate) mod manifest;
pub(crate) mod outcome;
pub(crate) mod pip;
pub(crate) mod project;
pub(crate) mod runtime;

#[cfg(test)]
pub(crate) mod testing;

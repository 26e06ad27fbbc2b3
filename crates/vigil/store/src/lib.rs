#![deny(unsafe_code)]
//! Repository port for the Vigil engine
//!
//! The engine and sweeper never touch a database; they speak to a
//! [`WorkflowStore`] supplied at construction. This crate defines that
//! port and ships [`MemoryStore`], an in-memory implementation used by
//! tests and embedded deployments. Production persistence lives outside
//! this workspace and implements the same trait.

pub mod memory;
pub mod port;

pub use memory::MemoryStore;
pub use port::WorkflowStore;

#![deny(unsafe_code)]
//! Lifecycle state machines for the Vigil engine
//!
//! One declarative transition table per workflow type, exposed through
//! [`StateMachineRegistry`]. Validation is pure and total: every lookup
//! returns a value, never an error, so callers can probe freely.

pub mod registry;

pub use registry::StateMachineRegistry;

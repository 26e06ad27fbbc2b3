#![deny(unsafe_code)]
//! In-process event bus for Vigil
//!
//! Decouples the workflow engine and the SLA sweeper from whatever
//! consumes their events (notification fan-out, audit trail). Delivery
//! is synchronous and in subscription order; a failing handler is logged
//! and skipped, never allowed to disturb the emitter or later handlers.
//!
//! The bus is deliberately not a message log: nothing is persisted and
//! nothing survives a restart. Construct one per process and hand it to
//! the components that need it; there is no global instance.

pub mod bus;
pub mod sink;

pub use bus::{EventBus, EventBusStats, HandlerError, HandlerResult};
pub use sink::register_audit_logging;

#![deny(unsafe_code)]
//! SLA evaluation for the Vigil case-management core
//!
//! Two halves:
//!
//! - [`evaluator`] is pure arithmetic: elapsed minutes, breach predicates,
//!   and derived deadlines. The caller always supplies `now`, so every
//!   function is deterministic and clock-free.
//! - [`sweeper`] drives the evaluator over all active entities on a
//!   schedule, emitting a breach event per overdue entity per tick.
//!   Deduplication is deliberately left to consumers.

pub mod evaluator;
pub mod sweeper;

pub use evaluator::{
    deadlines, elapsed_minutes, live_breach_check, metrics, resolution_breach_check, BreachCheck,
    SlaDeadlines, SlaMetrics,
};
pub use sweeper::{SlaSweeper, SweepSummary};

#![deny(unsafe_code)]
//! Core domain types for the Vigil workflow and SLA engine
//!
//! Vigil tracks three lifecycle entities in a senior-citizen welfare
//! program: field visits, SOS alerts, and identity verification requests.
//! This crate defines the shared vocabulary the other crates build on:
//!
//! - [`WorkflowType`] and the per-type state label sets
//! - [`WorkflowInstance`] approval chains and their append-only history
//! - [`EngineEvent`] domain events and their subscription keys
//! - [`WorkflowError`] failure taxonomy
//! - [`VigilConfig`] SLA thresholds and operational limits
//!
//! Everything here is plain data: no I/O, no clocks, no locks.

pub mod config;
pub mod entity;
pub mod errors;
pub mod events;
pub mod instance;
pub mod workflow;

pub use config::{SlaConfig, SlaThresholds, SweepConfig, VigilConfig, VisitDurationRules};
pub use entity::{EntityId, EntitySnapshot, SubjectId};
pub use errors::{WorkflowError, WorkflowResult};
pub use events::{BreachKind, BreachSeverity, EngineEvent, EventKind};
pub use instance::{
    ActorId, ApprovalDecision, ApprovalRecord, WorkflowInstance, WorkflowInstanceId,
    WorkflowStatus,
};
pub use workflow::{SosState, VerificationState, VisitState, WorkflowType};

//! Failure taxonomy for workflow and SLA operations
//!
//! Everything except `RepositoryUnavailable` is recoverable by the caller:
//! the operation returns the error and leaves all state unmodified.

use crate::entity::EntityId;
use crate::instance::{ActorId, WorkflowInstanceId, WorkflowStatus};
use crate::workflow::WorkflowType;
use thiserror::Error;

/// Errors surfaced by the engine, sweeper, and store
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The requested entity state change is not in the transition table
    #[error("invalid state transition for {workflow}: {from} -> {to}")]
    InvalidStateTransition {
        workflow: WorkflowType,
        from: String,
        to: String,
    },

    /// No instance with this identifier exists
    #[error("workflow instance not found: {0}")]
    WorkflowNotFound(WorkflowInstanceId),

    /// The instance already reached a terminal status
    #[error("workflow instance {id} is already closed ({status})")]
    WorkflowAlreadyClosed {
        id: WorkflowInstanceId,
        status: WorkflowStatus,
    },

    /// The actor is part of the chain but not entitled to act right now
    #[error("approver {actor} is not authorized for the current step of instance {id}")]
    ApproverNotAuthorized {
        id: WorkflowInstanceId,
        actor: ActorId,
    },

    /// The actor does not appear in the instance's approver chain at all
    #[error("approver {actor} is not part of instance {id}")]
    ApproverNotFound {
        id: WorkflowInstanceId,
        actor: ActorId,
    },

    /// The chain definition is unusable (e.g. no approvers)
    #[error("invalid workflow definition: {0}")]
    InvalidWorkflowDefinition(String),

    /// The subject entity could not be found in the store
    #[error("{workflow} entity not found: {id}")]
    EntityNotFound { workflow: WorkflowType, id: EntityId },

    /// A save raced an out-of-band write; reload and retry
    #[error("stale write for instance {id}: expected version {expected}, found {found}")]
    StaleInstance {
        id: WorkflowInstanceId,
        expected: u64,
        found: u64,
    },

    /// The persistence layer is down; the caller may retry the whole call
    #[error("repository unavailable: {0}")]
    RepositoryUnavailable(String),
}

impl WorkflowError {
    /// Check if this error indicates a persistence outage rather than a
    /// domain rule violation
    pub fn is_fatal(&self) -> bool {
        matches!(self, WorkflowError::RepositoryUnavailable(_))
    }
}

/// Convenience alias used across the workspace
pub type WorkflowResult<T> = Result<T, WorkflowError>;

//! Approval-chain workflow instances
//!
//! A WorkflowInstance is one running approval chain tied to a single
//! subject entity: an ordered list of required approvers, a cursor over
//! them, and an append-only history of decisions. Instances are owned
//! exclusively by the workflow engine; nothing else mutates them.

use crate::entity::EntityId;
use crate::workflow::WorkflowType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Identifiers ──────────────────────────────────────────────────────

/// Unique identifier for a workflow instance
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowInstanceId(pub String);

impl WorkflowInstanceId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn short(&self) -> &str {
        &self.0[..8.min(self.0.len())]
    }
}

impl std::fmt::Display for WorkflowInstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a staff member acting on a workflow (initiator or approver)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Status and Decisions ─────────────────────────────────────────────

/// Overall status of an approval chain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStatus {
    /// Created, no decision recorded yet
    #[default]
    Pending,
    /// At least one approval recorded, more steps remain
    InProgress,
    /// Every step approved
    Approved,
    /// Rejected at some step; rejection is final
    Rejected,
}

impl WorkflowStatus {
    /// Check if this is a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl std::fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WorkflowStatus::Pending => "PENDING",
            WorkflowStatus::InProgress => "IN_PROGRESS",
            WorkflowStatus::Approved => "APPROVED",
            WorkflowStatus::Rejected => "REJECTED",
        };
        write!(f, "{}", s)
    }
}

/// A single approve/reject decision
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalDecision {
    Approved,
    Rejected,
}

/// One recorded decision in an instance's history
///
/// Records are append-only: once written they are never edited or removed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApprovalRecord {
    /// Step index the decision was taken at
    pub step: usize,
    /// Who decided
    pub approver: ActorId,
    /// The decision
    pub decision: ApprovalDecision,
    /// When the decision was recorded
    pub decided_at: DateTime<Utc>,
    /// Free-text comment (mandatory reason for rejections)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

// ── Workflow Instance ────────────────────────────────────────────────

/// One running approval chain for a subject entity
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowInstance {
    /// Unique instance identifier
    pub id: WorkflowInstanceId,
    /// Lifecycle the subject entity belongs to
    pub workflow: WorkflowType,
    /// The entity being approved
    pub subject: EntityId,
    /// Who started the chain
    pub initiator: ActorId,
    /// Overall status
    pub status: WorkflowStatus,
    /// Required approvers, in decision order
    pub approvers: Vec<ActorId>,
    /// Index of the step currently awaiting a decision
    pub current_step: usize,
    /// Append-only decision history
    pub history: Vec<ApprovalRecord>,
    /// Persistence version, bumped on every save
    pub version: u64,
    /// When the instance was created
    pub created_at: DateTime<Utc>,
    /// When the instance was last updated
    pub updated_at: DateTime<Utc>,
    /// When the instance reached a terminal status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl WorkflowInstance {
    /// Create a new instance at step 0 with status `PENDING`
    pub fn new(
        workflow: WorkflowType,
        subject: EntityId,
        approvers: Vec<ActorId>,
        initiator: ActorId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: WorkflowInstanceId::generate(),
            workflow,
            subject,
            initiator,
            status: WorkflowStatus::Pending,
            approvers,
            current_step: 0,
            history: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    // ── Mutation (engine only) ───────────────────────────────────────

    /// Record an approval at the current step and advance the cursor
    ///
    /// Caller must have verified the approver first. Does not finalize;
    /// see [`finalize_approved`](Self::finalize_approved).
    pub fn approve_current(&mut self, approver: ActorId, comment: Option<String>) {
        self.history.push(ApprovalRecord {
            step: self.current_step,
            approver,
            decision: ApprovalDecision::Approved,
            decided_at: Utc::now(),
            comment,
        });
        self.current_step += 1;
        self.status = WorkflowStatus::InProgress;
        self.updated_at = Utc::now();
    }

    /// Close the instance as fully approved
    pub fn finalize_approved(&mut self) {
        self.status = WorkflowStatus::Approved;
        self.completed_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Record a rejection and close the instance
    pub fn finalize_rejected(&mut self, approver: ActorId, reason: impl Into<String>) {
        self.history.push(ApprovalRecord {
            step: self.current_step,
            approver,
            decision: ApprovalDecision::Rejected,
            decided_at: Utc::now(),
            comment: Some(reason.into()),
        });
        self.status = WorkflowStatus::Rejected;
        self.completed_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    // ── Query methods ────────────────────────────────────────────────

    /// Check if the instance has reached a terminal status
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Check if the instance is still open for decisions
    pub fn is_open(&self) -> bool {
        !self.is_terminal()
    }

    /// The approver whose decision is awaited right now
    pub fn current_approver(&self) -> Option<&ActorId> {
        if self.is_terminal() {
            return None;
        }
        self.approvers.get(self.current_step)
    }

    /// Check if the actor appears anywhere in the chain
    pub fn has_approver(&self, actor: &ActorId) -> bool {
        self.approvers.contains(actor)
    }

    /// Check if the actor is required at the current or a later step
    pub fn is_pending_approver(&self, actor: &ActorId) -> bool {
        self.is_open() && self.approvers[self.current_step.min(self.approvers.len())..].contains(actor)
    }

    /// Steps still awaiting a decision
    pub fn remaining_steps(&self) -> usize {
        self.approvers.len().saturating_sub(self.current_step)
    }

    /// All steps have been approved
    pub fn all_steps_approved(&self) -> bool {
        self.current_step >= self.approvers.len()
    }
}

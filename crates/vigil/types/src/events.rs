//! Domain events emitted by the engine and the SLA sweeper
//!
//! Events are in-process signals only. Nothing here is persisted; the
//! audit trail is the responsibility of whichever consumer subscribes.

use crate::entity::{EntityId, SubjectId};
use crate::instance::{ActorId, WorkflowInstanceId, WorkflowStatus};
use crate::workflow::WorkflowType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Event Kinds ──────────────────────────────────────────────────────

/// Subscription key for bus consumers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    WorkflowStarted,
    WorkflowStepApproved,
    WorkflowStepRejected,
    WorkflowCompleted,
    SlaBreachResponse,
    SlaBreachResolution,
}

impl EventKind {
    /// Every kind, in declaration order
    pub const ALL: [EventKind; 6] = [
        EventKind::WorkflowStarted,
        EventKind::WorkflowStepApproved,
        EventKind::WorkflowStepRejected,
        EventKind::WorkflowCompleted,
        EventKind::SlaBreachResponse,
        EventKind::SlaBreachResolution,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::WorkflowStarted => "WORKFLOW_STARTED",
            EventKind::WorkflowStepApproved => "WORKFLOW_STEP_APPROVED",
            EventKind::WorkflowStepRejected => "WORKFLOW_STEP_REJECTED",
            EventKind::WorkflowCompleted => "WORKFLOW_COMPLETED",
            EventKind::SlaBreachResponse => "SLA_BREACH_RESPONSE",
            EventKind::SlaBreachResolution => "SLA_BREACH_RESOLUTION",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── SLA Breach Vocabulary ────────────────────────────────────────────

/// Which deadline was missed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreachKind {
    Response,
    Resolution,
}

/// Operator-facing urgency of a breach
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BreachSeverity {
    Medium,
    High,
    Critical,
}

impl BreachSeverity {
    /// Severity of a breach for a given lifecycle and deadline kind
    ///
    /// An unanswered SOS is the one life-safety case and outranks
    /// everything else.
    pub fn classify(workflow: WorkflowType, kind: BreachKind) -> Self {
        match (workflow, kind) {
            (WorkflowType::Sos, BreachKind::Response) => BreachSeverity::Critical,
            (WorkflowType::Sos, BreachKind::Resolution) => BreachSeverity::High,
            (WorkflowType::Verification, _) => BreachSeverity::High,
            (WorkflowType::Visit, _) => BreachSeverity::Medium,
        }
    }
}

impl std::fmt::Display for BreachSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BreachSeverity::Medium => "MEDIUM",
            BreachSeverity::High => "HIGH",
            BreachSeverity::Critical => "CRITICAL",
        };
        write!(f, "{}", s)
    }
}

// ── Engine Events ────────────────────────────────────────────────────

/// A domain event carried by the bus
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum EngineEvent {
    /// An approval chain was started
    WorkflowStarted {
        instance_id: WorkflowInstanceId,
        workflow: WorkflowType,
        subject: EntityId,
        initiator: ActorId,
        approvers: Vec<ActorId>,
        at: DateTime<Utc>,
    },
    /// One step of a chain was approved
    WorkflowStepApproved {
        instance_id: WorkflowInstanceId,
        workflow: WorkflowType,
        step: usize,
        approver: ActorId,
        at: DateTime<Utc>,
    },
    /// A chain was rejected at some step
    WorkflowStepRejected {
        instance_id: WorkflowInstanceId,
        workflow: WorkflowType,
        step: usize,
        approver: ActorId,
        reason: String,
        at: DateTime<Utc>,
    },
    /// A chain reached a terminal status
    WorkflowCompleted {
        instance_id: WorkflowInstanceId,
        workflow: WorkflowType,
        status: WorkflowStatus,
        at: DateTime<Utc>,
    },
    /// An entity crossed an SLA deadline
    SlaBreach {
        entity: EntityId,
        workflow: WorkflowType,
        subject: SubjectId,
        kind: BreachKind,
        severity: BreachSeverity,
        minutes_elapsed: i64,
        threshold_minutes: u32,
        at: DateTime<Utc>,
    },
}

impl EngineEvent {
    /// The subscription key this event is delivered under
    pub fn kind(&self) -> EventKind {
        match self {
            EngineEvent::WorkflowStarted { .. } => EventKind::WorkflowStarted,
            EngineEvent::WorkflowStepApproved { .. } => EventKind::WorkflowStepApproved,
            EngineEvent::WorkflowStepRejected { .. } => EventKind::WorkflowStepRejected,
            EngineEvent::WorkflowCompleted { .. } => EventKind::WorkflowCompleted,
            EngineEvent::SlaBreach {
                kind: BreachKind::Response,
                ..
            } => EventKind::SlaBreachResponse,
            EngineEvent::SlaBreach {
                kind: BreachKind::Resolution,
                ..
            } => EventKind::SlaBreachResolution,
        }
    }
}

//! Workflow types and their state label vocabularies
//!
//! Each of the three lifecycle entities carries its own finite state set.
//! The label strings are part of the external contract: persisted rows and
//! downstream consumers match on them verbatim, including the inconsistent
//! casing across types, so they are never normalized or unified here.

use serde::{Deserialize, Serialize};

// ── Workflow Type ────────────────────────────────────────────────────

/// The kind of lifecycle entity a workflow operates on
///
/// Types are never cross-compatible: a state label is only meaningful
/// together with its type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkflowType {
    /// Field visit to a registered senior citizen
    Visit,
    /// Emergency SOS alert raised by or for a citizen
    Sos,
    /// Identity verification request for a registration
    Verification,
}

impl WorkflowType {
    /// All workflow types, in sweep order
    pub const ALL: [WorkflowType; 3] = [
        WorkflowType::Visit,
        WorkflowType::Sos,
        WorkflowType::Verification,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowType::Visit => "VISIT",
            WorkflowType::Sos => "SOS",
            WorkflowType::Verification => "VERIFICATION",
        }
    }

    /// State an entity of this type starts in, where it awaits a response
    pub fn awaiting_state(&self) -> &'static str {
        match self {
            WorkflowType::Visit => VisitState::Scheduled.as_str(),
            WorkflowType::Sos => SosState::Active.as_str(),
            WorkflowType::Verification => VerificationState::Pending.as_str(),
        }
    }

    /// State meaning "responded to but not yet resolved"
    pub fn responded_state(&self) -> &'static str {
        match self {
            WorkflowType::Visit => VisitState::InProgress.as_str(),
            WorkflowType::Sos => SosState::Responded.as_str(),
            WorkflowType::Verification => VerificationState::InProgress.as_str(),
        }
    }

    /// State applied to the subject entity when an approval chain fully approves
    pub fn approved_state(&self) -> &'static str {
        match self {
            WorkflowType::Visit => VisitState::Completed.as_str(),
            WorkflowType::Sos => SosState::Resolved.as_str(),
            WorkflowType::Verification => VerificationState::Verified.as_str(),
        }
    }
}

impl std::fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Visit States ─────────────────────────────────────────────────────

/// Lifecycle states of a field visit (labels are SCREAMING_SNAKE_CASE)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitState {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Rescheduled,
}

impl VisitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitState::Scheduled => "SCHEDULED",
            VisitState::InProgress => "IN_PROGRESS",
            VisitState::Completed => "COMPLETED",
            VisitState::Cancelled => "CANCELLED",
            VisitState::Rescheduled => "RESCHEDULED",
        }
    }

    /// Parse an exact label; case-sensitive, no trimming
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "SCHEDULED" => Some(VisitState::Scheduled),
            "IN_PROGRESS" => Some(VisitState::InProgress),
            "COMPLETED" => Some(VisitState::Completed),
            "CANCELLED" => Some(VisitState::Cancelled),
            "RESCHEDULED" => Some(VisitState::Rescheduled),
            _ => None,
        }
    }
}

impl std::fmt::Display for VisitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── SOS States ───────────────────────────────────────────────────────

/// Lifecycle states of an SOS alert (labels are PascalCase)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SosState {
    Active,
    Responded,
    Resolved,
    FalseAlarm,
}

impl SosState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SosState::Active => "Active",
            SosState::Responded => "Responded",
            SosState::Resolved => "Resolved",
            SosState::FalseAlarm => "FalseAlarm",
        }
    }

    /// Parse an exact label; case-sensitive, no trimming
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Active" => Some(SosState::Active),
            "Responded" => Some(SosState::Responded),
            "Resolved" => Some(SosState::Resolved),
            "FalseAlarm" => Some(SosState::FalseAlarm),
            _ => None,
        }
    }
}

impl std::fmt::Display for SosState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Verification States ──────────────────────────────────────────────

/// Lifecycle states of an identity verification request
///
/// Note the embedded space in `In Progress`: the label set predates this
/// engine and is matched verbatim by downstream consumers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerificationState {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Verified,
    Rejected,
}

impl VerificationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationState::Pending => "Pending",
            VerificationState::InProgress => "In Progress",
            VerificationState::Verified => "Verified",
            VerificationState::Rejected => "Rejected",
        }
    }

    /// Parse an exact label; case-sensitive, no trimming
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Pending" => Some(VerificationState::Pending),
            "In Progress" => Some(VerificationState::InProgress),
            "Verified" => Some(VerificationState::Verified),
            "Rejected" => Some(VerificationState::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for VerificationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

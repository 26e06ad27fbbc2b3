//! Declarative transition tables and their lookup surface
//!
//! Tables are keyed by exact state labels. Lookups never normalize,
//! never fail: an unknown `from` state or a terminal `from` state simply
//! yields no permitted targets. Self-transitions are illegal unless a
//! table lists them explicitly, so a repeated write can never pass as
//! progress.

use vigil_types::WorkflowType;

/// One source state and its permitted targets
type TransitionRow = (&'static str, &'static [&'static str]);

// Cancellation and rejection are final: once a visit is cancelled or a
// verification rejected, a fresh entity must be created instead of
// reviving the old row.
const VISIT_TRANSITIONS: &[TransitionRow] = &[
    ("SCHEDULED", &["IN_PROGRESS", "CANCELLED", "RESCHEDULED"]),
    ("IN_PROGRESS", &["COMPLETED", "CANCELLED"]),
    ("COMPLETED", &[]),
    ("CANCELLED", &[]),
    ("RESCHEDULED", &["SCHEDULED"]),
];

const SOS_TRANSITIONS: &[TransitionRow] = &[
    ("Active", &["Responded", "FalseAlarm"]),
    ("Responded", &["Resolved"]),
    ("Resolved", &[]),
    ("FalseAlarm", &[]),
];

const VERIFICATION_TRANSITIONS: &[TransitionRow] = &[
    ("Pending", &["In Progress", "Rejected"]),
    ("In Progress", &["Verified", "Rejected"]),
    ("Verified", &[]),
    ("Rejected", &[]),
];

/// Pure lookup surface over the per-type transition tables
///
/// Stateless and `Copy`; share it freely across tasks.
#[derive(Clone, Copy, Debug, Default)]
pub struct StateMachineRegistry;

impl StateMachineRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Check whether `from -> to` is a legal transition for the type
    ///
    /// Returns `false` for unknown states, terminal `from` states, and
    /// unlisted targets. Never panics.
    pub fn is_valid_transition(&self, workflow: WorkflowType, from: &str, to: &str) -> bool {
        self.allowed_transitions(workflow, from).contains(&to)
    }

    /// Permitted target states from `from`, empty for unknown or terminal
    pub fn allowed_transitions(
        &self,
        workflow: WorkflowType,
        from: &str,
    ) -> &'static [&'static str] {
        Self::table(workflow)
            .iter()
            .find(|(state, _)| *state == from)
            .map(|(_, targets)| *targets)
            .unwrap_or(&[])
    }

    /// Check whether a state is terminal for the type
    ///
    /// Unknown labels are not terminal; they are not states at all.
    pub fn is_terminal(&self, workflow: WorkflowType, state: &str) -> bool {
        Self::table(workflow)
            .iter()
            .any(|(s, targets)| *s == state && targets.is_empty())
    }

    /// Check whether a label names a state of the type
    pub fn is_known_state(&self, workflow: WorkflowType, state: &str) -> bool {
        Self::table(workflow).iter().any(|(s, _)| *s == state)
    }

    /// All states of the type, in table order
    pub fn states(&self, workflow: WorkflowType) -> Vec<&'static str> {
        Self::table(workflow).iter().map(|(s, _)| *s).collect()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn table(workflow: WorkflowType) -> &'static [TransitionRow] {
        match workflow {
            WorkflowType::Visit => VISIT_TRANSITIONS,
            WorkflowType::Sos => SOS_TRANSITIONS,
            WorkflowType::Verification => VERIFICATION_TRANSITIONS,
        }
    }
}

//! Entity snapshots read through the repository port
//!
//! The engine never owns entity rows; it sees read-only snapshots loaded
//! by the persistence layer and writes back nothing but a new state label.

use crate::workflow::WorkflowType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Identifiers ──────────────────────────────────────────────────────

/// Unique identifier for a lifecycle entity (visit, alert, or request)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub String);

impl EntityId {
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

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the senior citizen an entity concerns
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub String);

impl SubjectId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Entity Snapshot ──────────────────────────────────────────────────

/// Point-in-time view of a lifecycle entity
///
/// `state` is the raw persisted label; it is validated against the type's
/// vocabulary at the lifecycle layer, not here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Unique entity identifier
    pub id: EntityId,
    /// Which lifecycle this entity belongs to
    pub workflow: WorkflowType,
    /// The citizen this entity concerns
    pub subject: SubjectId,
    /// Current state label, verbatim from the store
    pub state: String,
    /// When the entity was created
    pub created_at: DateTime<Utc>,
    /// When the entity was first responded to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<DateTime<Utc>>,
    /// When the entity was resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    /// Metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl EntitySnapshot {
    /// Create a fresh entity in its type's awaiting state
    pub fn new(workflow: WorkflowType, subject: SubjectId) -> Self {
        Self {
            id: EntityId::generate(),
            workflow,
            subject,
            state: workflow.awaiting_state().to_string(),
            created_at: Utc::now(),
            responded_at: None,
            resolved_at: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = id;
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    pub fn with_responded_at(mut self, at: DateTime<Utc>) -> Self {
        self.responded_at = Some(at);
        self
    }

    pub fn with_resolved_at(mut self, at: DateTime<Utc>) -> Self {
        self.resolved_at = Some(at);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Entity sits in its type's awaiting-response state
    pub fn is_awaiting_response(&self) -> bool {
        self.state == self.workflow.awaiting_state()
    }

    /// Entity has been responded to but not resolved
    pub fn is_awaiting_resolution(&self) -> bool {
        self.state == self.workflow.responded_state() && self.resolved_at.is_none()
    }
}

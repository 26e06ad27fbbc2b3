//! The persistence port consumed by the engine and the sweeper

use async_trait::async_trait;
use vigil_types::{
    EntityId, EntitySnapshot, WorkflowInstance, WorkflowInstanceId, WorkflowResult, WorkflowType,
};

/// Async repository interface
///
/// Implementations must be safe to share across tasks. Infrastructure
/// failures (connection loss, timeouts) surface as
/// `WorkflowError::RepositoryUnavailable`; domain lookups that find
/// nothing return `Ok(None)` or an empty list, never an error.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Load one entity snapshot
    async fn load_entity(
        &self,
        workflow: WorkflowType,
        id: &EntityId,
    ) -> WorkflowResult<Option<EntitySnapshot>>;

    /// Persist a new state label for an entity
    async fn save_entity_state(
        &self,
        workflow: WorkflowType,
        id: &EntityId,
        new_state: &str,
    ) -> WorkflowResult<()>;

    /// Load one workflow instance
    async fn load_instance(
        &self,
        id: &WorkflowInstanceId,
    ) -> WorkflowResult<Option<WorkflowInstance>>;

    /// Persist an instance and return the new stored version
    ///
    /// `instance.version` must match the stored version (0 for a first
    /// save); a mismatch fails with `WorkflowError::StaleInstance` and
    /// writes nothing. On success the stored copy carries the returned,
    /// incremented version.
    async fn save_instance(&self, instance: &WorkflowInstance) -> WorkflowResult<u64>;

    /// All entities of a type not yet in a terminal state
    async fn find_active_entities(
        &self,
        workflow: WorkflowType,
    ) -> WorkflowResult<Vec<EntitySnapshot>>;

    /// All workflow instances not yet in a terminal status
    async fn find_open_instances(&self) -> WorkflowResult<Vec<WorkflowInstance>>;
}

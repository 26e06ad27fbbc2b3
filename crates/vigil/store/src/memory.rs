//! In-memory store for development and testing
//!
//! Implements the full [`WorkflowStore`] port over concurrent maps.
//! Not suitable for production use: nothing survives a restart. The
//! failure injection hooks exist so tests can exercise outage paths.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use vigil_lifecycle::StateMachineRegistry;
use vigil_types::{
    EntityId, EntitySnapshot, WorkflowError, WorkflowInstance, WorkflowInstanceId, WorkflowResult,
    WorkflowType,
};

use crate::port::WorkflowStore;

/// In-memory repository implementation
pub struct MemoryStore {
    /// Entities keyed by (type, id)
    entities: Arc<DashMap<(WorkflowType, EntityId), EntitySnapshot>>,

    /// Workflow instances keyed by id
    instances: Arc<DashMap<WorkflowInstanceId, WorkflowInstance>>,

    /// Entity ids whose reads fail with `RepositoryUnavailable`
    failing_entities: Arc<DashMap<EntityId, String>>,

    /// When set, every operation fails with `RepositoryUnavailable`
    offline: Arc<AtomicBool>,

    registry: StateMachineRegistry,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entities: Arc::new(DashMap::new()),
            instances: Arc::new(DashMap::new()),
            failing_entities: Arc::new(DashMap::new()),
            offline: Arc::new(AtomicBool::new(false)),
            registry: StateMachineRegistry::new(),
        }
    }

    /// Seed an entity
    pub fn insert_entity(&self, entity: EntitySnapshot) {
        self.entities
            .insert((entity.workflow, entity.id.clone()), entity);
    }

    /// Number of entities stored
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of instances stored
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Drop everything, including failure marks
    pub fn clear(&self) {
        self.entities.clear();
        self.instances.clear();
        self.failing_entities.clear();
        self.offline.store(false, Ordering::SeqCst);
    }

    // ── Failure injection ────────────────────────────────────────────

    /// Simulate a total outage (all operations fail while set)
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make reads of one entity fail with the given message
    pub fn fail_entity(&self, id: EntityId, message: impl Into<String>) {
        self.failing_entities.insert(id, message.into());
    }

    fn check_online(&self) -> WorkflowResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(WorkflowError::RepositoryUnavailable(
                "store is offline".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkflowStore for MemoryStore {
    async fn load_entity(
        &self,
        workflow: WorkflowType,
        id: &EntityId,
    ) -> WorkflowResult<Option<EntitySnapshot>> {
        self.check_online()?;
        if let Some(message) = self.failing_entities.get(id) {
            return Err(WorkflowError::RepositoryUnavailable(message.clone()));
        }
        Ok(self
            .entities
            .get(&(workflow, id.clone()))
            .map(|e| e.clone()))
    }

    async fn save_entity_state(
        &self,
        workflow: WorkflowType,
        id: &EntityId,
        new_state: &str,
    ) -> WorkflowResult<()> {
        self.check_online()?;
        match self.entities.get_mut(&(workflow, id.clone())) {
            Some(mut entity) => {
                entity.state = new_state.to_string();
                Ok(())
            }
            None => Err(WorkflowError::EntityNotFound {
                workflow,
                id: id.clone(),
            }),
        }
    }

    async fn load_instance(
        &self,
        id: &WorkflowInstanceId,
    ) -> WorkflowResult<Option<WorkflowInstance>> {
        self.check_online()?;
        Ok(self.instances.get(id).map(|i| i.clone()))
    }

    async fn save_instance(&self, instance: &WorkflowInstance) -> WorkflowResult<u64> {
        self.check_online()?;
        match self.instances.entry(instance.id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(mut slot) => {
                let stored = slot.get().version;
                if stored != instance.version {
                    return Err(WorkflowError::StaleInstance {
                        id: instance.id.clone(),
                        expected: stored,
                        found: instance.version,
                    });
                }
                let mut updated = instance.clone();
                updated.version = stored + 1;
                let version = updated.version;
                slot.insert(updated);
                Ok(version)
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                let mut stored = instance.clone();
                stored.version = instance.version + 1;
                let version = stored.version;
                slot.insert(stored);
                Ok(version)
            }
        }
    }

    async fn find_active_entities(
        &self,
        workflow: WorkflowType,
    ) -> WorkflowResult<Vec<EntitySnapshot>> {
        self.check_online()?;
        Ok(self
            .entities
            .iter()
            .filter(|e| {
                e.key().0 == workflow && !self.registry.is_terminal(workflow, &e.value().state)
            })
            .map(|e| e.value().clone())
            .collect())
    }

    async fn find_open_instances(&self) -> WorkflowResult<Vec<WorkflowInstance>> {
        self.check_online()?;
        Ok(self
            .instances
            .iter()
            .filter(|i| i.value().is_open())
            .map(|i| i.value().clone())
            .collect())
    }
}

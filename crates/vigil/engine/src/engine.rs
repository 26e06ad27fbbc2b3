//! The workflow engine: sequential approval chains over case entities
//!
//! The engine coordinates decisions, it never decides. Every operation
//! validates against the in-memory copy, persists through the store
//! port, and only then emits events; a failed call leaves the stored
//! instance and the subject entity exactly as they were.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;

use vigil_bus::EventBus;
use vigil_lifecycle::StateMachineRegistry;
use vigil_store::WorkflowStore;
use vigil_types::{
    ActorId, EngineEvent, EntityId, WorkflowError, WorkflowInstance, WorkflowInstanceId,
    WorkflowResult, WorkflowType,
};

/// Runs approval chains and applies outcome transitions
///
/// Decisions on the same instance are serialized through a per-instance
/// lock; decisions on different instances proceed in parallel. The store
/// port additionally rejects stale writes, which covers writers outside
/// this process.
pub struct WorkflowEngine {
    store: Arc<dyn WorkflowStore>,
    bus: Arc<EventBus>,
    registry: StateMachineRegistry,
    /// Per-instance decision locks; entries are dropped once the
    /// instance closes
    locks: DashMap<WorkflowInstanceId, Arc<Mutex<()>>>,
}

impl WorkflowEngine {
    /// Create an engine over the given store and bus
    pub fn new(store: Arc<dyn WorkflowStore>, bus: Arc<EventBus>) -> Self {
        Self {
            store,
            bus,
            registry: StateMachineRegistry::new(),
            locks: DashMap::new(),
        }
    }

    // ── Chain Lifecycle ──────────────────────────────────────────────

    /// Start an approval chain over an existing entity.
    ///
    /// The approver list is the ordered set of required decisions; it
    /// must be non-empty. The new instance starts at step 0 with status
    /// `PENDING` and is persisted before `WORKFLOW_STARTED` goes out.
    pub async fn start(
        &self,
        workflow: WorkflowType,
        subject: EntityId,
        approvers: Vec<ActorId>,
        initiator: ActorId,
    ) -> WorkflowResult<WorkflowInstance> {
        if approvers.is_empty() {
            return Err(WorkflowError::InvalidWorkflowDefinition(
                "approver chain must not be empty".to_string(),
            ));
        }
        if self.store.load_entity(workflow, &subject).await?.is_none() {
            return Err(WorkflowError::EntityNotFound {
                workflow,
                id: subject,
            });
        }

        let mut instance = WorkflowInstance::new(workflow, subject, approvers, initiator);
        instance.version = self.store.save_instance(&instance).await?;

        tracing::info!(
            instance_id = %instance.id,
            workflow = %workflow,
            subject = %instance.subject,
            steps = instance.approvers.len(),
            "Workflow started"
        );
        self.bus.emit(EngineEvent::WorkflowStarted {
            instance_id: instance.id.clone(),
            workflow,
            subject: instance.subject.clone(),
            initiator: instance.initiator.clone(),
            approvers: instance.approvers.clone(),
            at: Utc::now(),
        });

        Ok(instance)
    }

    /// Approve the current step of an open instance.
    ///
    /// Only the approver required at the current step may approve; the
    /// chain is strictly ordered and steps cannot be skipped. The final
    /// approval closes the chain as `APPROVED` and moves the subject
    /// entity to its outcome state through the lifecycle registry. An
    /// outcome transition the registry does not permit fails the call
    /// with nothing written.
    pub async fn approve_step(
        &self,
        id: &WorkflowInstanceId,
        approver: &ActorId,
        comment: Option<String>,
    ) -> WorkflowResult<WorkflowInstance> {
        let lock = self.instance_lock(id);
        let _guard = lock.lock().await;

        let mut instance = self.load_open(id).await?;
        if !instance.has_approver(approver) {
            return Err(WorkflowError::ApproverNotFound {
                id: id.clone(),
                actor: approver.clone(),
            });
        }
        if instance.current_approver() != Some(approver) {
            return Err(WorkflowError::ApproverNotAuthorized {
                id: id.clone(),
                actor: approver.clone(),
            });
        }

        let step = instance.current_step;
        instance.approve_current(approver.clone(), comment);

        let finished = instance.all_steps_approved();
        if finished {
            self.apply_outcome(&instance).await?;
            instance.finalize_approved();
        }
        instance.version = self.store.save_instance(&instance).await?;

        tracing::info!(
            instance_id = %instance.id,
            approver = %approver,
            step,
            remaining = instance.remaining_steps(),
            "Workflow step approved"
        );
        self.bus.emit(EngineEvent::WorkflowStepApproved {
            instance_id: instance.id.clone(),
            workflow: instance.workflow,
            step,
            approver: approver.clone(),
            at: Utc::now(),
        });
        if finished {
            self.finish(&instance);
        }

        Ok(instance)
    }

    /// Reject an open instance.
    ///
    /// Any approver whose step is still pending (current or later) may
    /// reject. Rejection closes the chain immediately and is final; the
    /// subject entity is left untouched.
    pub async fn reject_step(
        &self,
        id: &WorkflowInstanceId,
        approver: &ActorId,
        reason: impl Into<String>,
    ) -> WorkflowResult<WorkflowInstance> {
        let reason = reason.into();
        let lock = self.instance_lock(id);
        let _guard = lock.lock().await;

        let mut instance = self.load_open(id).await?;
        if !instance.has_approver(approver) {
            return Err(WorkflowError::ApproverNotFound {
                id: id.clone(),
                actor: approver.clone(),
            });
        }
        if !instance.is_pending_approver(approver) {
            return Err(WorkflowError::ApproverNotAuthorized {
                id: id.clone(),
                actor: approver.clone(),
            });
        }

        let step = instance.current_step;
        instance.finalize_rejected(approver.clone(), reason.clone());
        instance.version = self.store.save_instance(&instance).await?;

        tracing::info!(
            instance_id = %instance.id,
            approver = %approver,
            reason = %reason,
            "Workflow rejected"
        );
        self.bus.emit(EngineEvent::WorkflowStepRejected {
            instance_id: instance.id.clone(),
            workflow: instance.workflow,
            step,
            approver: approver.clone(),
            reason,
            at: Utc::now(),
        });
        self.finish(&instance);

        Ok(instance)
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Open instances waiting on this approver's decision right now.
    ///
    /// Later-step assignments are not included; an approver sees an
    /// instance only once the chain reaches their step.
    pub async fn pending_for(&self, approver: &ActorId) -> WorkflowResult<Vec<WorkflowInstance>> {
        let open = self.store.find_open_instances().await?;
        Ok(open
            .into_iter()
            .filter(|instance| instance.current_approver() == Some(approver))
            .collect())
    }

    /// Look up one instance
    pub async fn status_of(&self, id: &WorkflowInstanceId) -> WorkflowResult<WorkflowInstance> {
        self.store
            .load_instance(id)
            .await?
            .ok_or_else(|| WorkflowError::WorkflowNotFound(id.clone()))
    }

    // ── Internals ────────────────────────────────────────────────────

    fn instance_lock(&self, id: &WorkflowInstanceId) -> Arc<Mutex<()>> {
        self.locks
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn load_open(&self, id: &WorkflowInstanceId) -> WorkflowResult<WorkflowInstance> {
        let instance = self
            .store
            .load_instance(id)
            .await?
            .ok_or_else(|| WorkflowError::WorkflowNotFound(id.clone()))?;
        if instance.is_terminal() {
            return Err(WorkflowError::WorkflowAlreadyClosed {
                id: id.clone(),
                status: instance.status,
            });
        }
        Ok(instance)
    }

    /// Move the subject entity to its outcome state.
    ///
    /// Nothing is written until the transition has passed the registry,
    /// so an illegal outcome leaves both the entity and the instance as
    /// they were.
    async fn apply_outcome(&self, instance: &WorkflowInstance) -> WorkflowResult<()> {
        let entity = self
            .store
            .load_entity(instance.workflow, &instance.subject)
            .await?
            .ok_or_else(|| WorkflowError::EntityNotFound {
                workflow: instance.workflow,
                id: instance.subject.clone(),
            })?;

        let outcome = instance.workflow.approved_state();
        if !self
            .registry
            .is_valid_transition(instance.workflow, &entity.state, outcome)
        {
            return Err(WorkflowError::InvalidStateTransition {
                workflow: instance.workflow,
                from: entity.state,
                to: outcome.to_string(),
            });
        }
        self.store
            .save_entity_state(instance.workflow, &instance.subject, outcome)
            .await
    }

    fn finish(&self, instance: &WorkflowInstance) {
        tracing::info!(
            instance_id = %instance.id,
            status = %instance.status,
            "Workflow completed"
        );
        self.bus.emit(EngineEvent::WorkflowCompleted {
            instance_id: instance.id.clone(),
            workflow: instance.workflow,
            status: instance.status,
            at: Utc::now(),
        });
        self.locks.remove(&instance.id);
    }
}

impl std::fmt::Debug for WorkflowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowEngine")
            .field("locked_instances", &self.locks.len())
            .finish_non_exhaustive()
    }
}

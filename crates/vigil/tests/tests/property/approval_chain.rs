//! Property tests: approval chains of any length decide in order, and any
//! pending approver can end one.

use std::sync::Arc;

use proptest::prelude::*;
use vigil_bus::EventBus;
use vigil_engine::WorkflowEngine;
use vigil_store::{MemoryStore, WorkflowStore};
use vigil_types::{
    ActorId, EntityId, EntitySnapshot, SubjectId, WorkflowError, WorkflowInstance, WorkflowStatus,
    WorkflowType,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn chain(n: usize) -> Vec<ActorId> {
    (0..n).map(|i| ActorId::new(format!("approver-{i}"))).collect()
}

fn stack() -> (WorkflowEngine, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let engine = WorkflowEngine::new(store.clone(), Arc::new(EventBus::new()));
    (engine, store)
}

/// Seed a visit that is legally allowed to complete, and start a chain of
/// `n` approvers over it.
async fn started_visit_chain(
    engine: &WorkflowEngine,
    store: &MemoryStore,
    n: usize,
) -> (WorkflowInstance, EntityId, Vec<ActorId>) {
    let visit = EntitySnapshot::new(WorkflowType::Visit, SubjectId::new("citizen-7"))
        .with_state("IN_PROGRESS");
    let visit_id = visit.id.clone();
    store.insert_entity(visit);

    let approvers = chain(n);
    let instance = engine
        .start(
            WorkflowType::Visit,
            visit_id.clone(),
            approvers.clone(),
            ActorId::new("dispatcher"),
        )
        .await
        .unwrap();
    (instance, visit_id, approvers)
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// In-order approval always closes the chain and commits the outcome,
    /// whatever its length.
    #[test]
    fn ordered_chains_always_approve(n in 1usize..6) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let (engine, store) = stack();
            let (instance, visit_id, approvers) = started_visit_chain(&engine, &store, n).await;

            for approver in &approvers {
                engine.approve_step(&instance.id, approver, None).await.unwrap();
            }

            let closed = engine.status_of(&instance.id).await.unwrap();
            assert_eq!(closed.status, WorkflowStatus::Approved);
            assert_eq!(closed.history.len(), n);
            assert_eq!(closed.version, (n as u64) + 1);

            let visit = store
                .load_entity(WorkflowType::Visit, &visit_id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(visit.state, "COMPLETED");
        });
    }

    /// Whoever is not at the cursor, their approval is refused and the
    /// stored instance stays exactly as persisted at start.
    #[test]
    fn out_of_order_first_call_always_fails(n in 2usize..6, wrong in 1usize..5) {
        prop_assume!(wrong < n);
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let (engine, store) = stack();
            let (instance, visit_id, approvers) = started_visit_chain(&engine, &store, n).await;

            let err = engine
                .approve_step(&instance.id, &approvers[wrong], None)
                .await
                .unwrap_err();
            assert!(matches!(err, WorkflowError::ApproverNotAuthorized { .. }));

            let stored = engine.status_of(&instance.id).await.unwrap();
            assert_eq!(stored.status, WorkflowStatus::Pending);
            assert!(stored.history.is_empty());
            assert_eq!(stored.version, 1);

            let visit = store
                .load_entity(WorkflowType::Visit, &visit_id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(visit.state, "IN_PROGRESS");
        });
    }

    /// Any approver at or past the cursor can reject, the rejection is
    /// final, and the subject is never touched.
    #[test]
    fn any_pending_approver_can_kill_the_chain(
        n in 2usize..6,
        decided in 0usize..4,
        rejector in 0usize..5,
    ) {
        prop_assume!(decided < n && rejector < n && rejector >= decided);
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let (engine, store) = stack();
            let (instance, visit_id, approvers) = started_visit_chain(&engine, &store, n).await;

            for approver in approvers.iter().take(decided) {
                engine.approve_step(&instance.id, approver, None).await.unwrap();
            }
            engine
                .reject_step(&instance.id, &approvers[rejector], "not satisfied")
                .await
                .unwrap();

            let closed = engine.status_of(&instance.id).await.unwrap();
            assert_eq!(closed.status, WorkflowStatus::Rejected);
            assert_eq!(closed.history.len(), decided + 1);
            assert_eq!(closed.history[decided].step, decided);

            let later = engine
                .approve_step(&instance.id, &approvers[n - 1], None)
                .await
                .unwrap_err();
            assert!(matches!(later, WorkflowError::WorkflowAlreadyClosed { .. }));

            let visit = store
                .load_entity(WorkflowType::Visit, &visit_id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(visit.state, "IN_PROGRESS");
        });
    }
}

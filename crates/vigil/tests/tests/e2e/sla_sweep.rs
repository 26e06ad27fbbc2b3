//! Sweep scenarios: overdue entities surface as breach events, every tick.
//!
//! The sweeper is exercised against a mixed fleet of entities the way a
//! deployment would see it, with the engine sharing the same bus.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use vigil_bus::{register_audit_logging, EventBus};
use vigil_engine::WorkflowEngine;
use vigil_sla::SlaSweeper;
use vigil_store::MemoryStore;
use vigil_tests::init_tracing;
use vigil_types::{
    ActorId, BreachKind, BreachSeverity, EngineEvent, EntitySnapshot, EventKind, SubjectId,
    VigilConfig, WorkflowType,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn stack() -> (SlaSweeper, Arc<MemoryStore>, Arc<EventBus>) {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let bus = Arc::new(EventBus::new());
    register_audit_logging(&bus);
    let sweeper = SlaSweeper::new(store.clone(), bus.clone(), VigilConfig::default());
    (sweeper, store, bus)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unanswered_sos_surfaces_as_critical_breach() {
    let (sweeper, store, bus) = stack();
    let now = Utc::now();
    let sos = EntitySnapshot::new(WorkflowType::Sos, SubjectId::new("citizen-7"))
        .with_created_at(now - Duration::minutes(16));
    let sos_id = sos.id.clone();
    store.insert_entity(sos);
    let mut events = bus.watch();

    let summary = sweeper.sweep(now).await;

    assert_eq!(summary.scanned, 1);
    assert_eq!(summary.response_breaches, 1);
    assert_eq!(bus.emitted_count(EventKind::SlaBreachResponse), 1);

    match events.try_recv().unwrap() {
        EngineEvent::SlaBreach {
            entity,
            subject,
            kind,
            severity,
            minutes_elapsed,
            threshold_minutes,
            ..
        } => {
            assert_eq!(entity, sos_id);
            assert_eq!(subject, SubjectId::new("citizen-7"));
            assert_eq!(kind, BreachKind::Response);
            assert_eq!(severity, BreachSeverity::Critical);
            assert_eq!(minutes_elapsed, 16);
            assert_eq!(threshold_minutes, 15);
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn mixed_fleet_single_tick() {
    let (sweeper, store, bus) = stack();
    let now = Utc::now();

    // An SOS nobody answered
    store.insert_entity(
        EntitySnapshot::new(WorkflowType::Sos, SubjectId::new("c-1"))
            .with_created_at(now - Duration::minutes(20)),
    );
    // An SOS still inside its window
    store.insert_entity(
        EntitySnapshot::new(WorkflowType::Sos, SubjectId::new("c-2"))
            .with_created_at(now - Duration::minutes(5)),
    );
    // An SOS answered fast but dragging toward resolution
    store.insert_entity(
        EntitySnapshot::new(WorkflowType::Sos, SubjectId::new("c-3"))
            .with_created_at(now - Duration::minutes(70))
            .with_state("Responded")
            .with_responded_at(now - Duration::minutes(65)),
    );
    // A verification request stuck for over a week
    store.insert_entity(
        EntitySnapshot::new(WorkflowType::Verification, SubjectId::new("c-4"))
            .with_created_at(now - Duration::days(8)),
    );
    // A routine visit well inside its month
    store.insert_entity(
        EntitySnapshot::new(WorkflowType::Visit, SubjectId::new("c-5"))
            .with_created_at(now - Duration::days(1)),
    );

    let mut events = bus.watch();
    let summary = sweeper.sweep(now).await;

    assert_eq!(summary.scanned, 5);
    assert_eq!(summary.response_breaches, 2);
    assert_eq!(summary.resolution_breaches, 1);
    assert_eq!(summary.errors, 0);
    assert!(!summary.truncated);

    let mut seen = Vec::new();
    while let Ok(EngineEvent::SlaBreach { workflow, kind, severity, .. }) = events.try_recv() {
        seen.push((workflow, kind, severity));
    }
    assert_eq!(seen.len(), 3);
    assert!(seen.contains(&(
        WorkflowType::Sos,
        BreachKind::Response,
        BreachSeverity::Critical
    )));
    assert!(seen.contains(&(
        WorkflowType::Sos,
        BreachKind::Resolution,
        BreachSeverity::High
    )));
    assert!(seen.contains(&(
        WorkflowType::Verification,
        BreachKind::Response,
        BreachSeverity::High
    )));
}

#[tokio::test]
async fn deduplication_is_the_consumers_job() {
    let (sweeper, store, bus) = stack();
    let now = Utc::now();
    store.insert_entity(
        EntitySnapshot::new(WorkflowType::Sos, SubjectId::new("c-1"))
            .with_created_at(now - Duration::minutes(30)),
    );

    let deliveries = Arc::new(AtomicUsize::new(0));
    let unique = Arc::new(Mutex::new(HashSet::new()));
    {
        let deliveries = deliveries.clone();
        let unique = unique.clone();
        bus.subscribe(EventKind::SlaBreachResponse, move |event| {
            deliveries.fetch_add(1, Ordering::SeqCst);
            if let EngineEvent::SlaBreach { entity, .. } = event {
                unique.lock().unwrap().insert(entity.clone());
            }
            Ok(())
        });
    }

    // Three ticks, condition persisting throughout
    sweeper.sweep(now).await;
    sweeper.sweep(now + Duration::minutes(5)).await;
    sweeper.sweep(now + Duration::minutes(10)).await;

    assert_eq!(deliveries.load(Ordering::SeqCst), 3);
    assert_eq!(unique.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn engine_and_sweeper_share_one_bus() {
    let (sweeper, store, bus) = stack();
    let engine = WorkflowEngine::new(store.clone(), bus.clone());
    let now = Utc::now();

    // One overdue SOS for the sweeper to find
    store.insert_entity(
        EntitySnapshot::new(WorkflowType::Sos, SubjectId::new("c-1"))
            .with_created_at(now - Duration::minutes(45)),
    );
    // One visit chain for the engine to close
    let visit = EntitySnapshot::new(WorkflowType::Visit, SubjectId::new("c-2"))
        .with_state("IN_PROGRESS");
    let visit_id = visit.id.clone();
    store.insert_entity(visit);

    let instance = engine
        .start(
            WorkflowType::Visit,
            visit_id,
            vec![ActorId::new("supervisor")],
            ActorId::new("clerk"),
        )
        .await
        .unwrap();
    engine
        .approve_step(&instance.id, &ActorId::new("supervisor"), None)
        .await
        .unwrap();
    sweeper.sweep(now).await;

    let stats = bus.stats();
    assert_eq!(stats.total_emitted, 4);
    assert_eq!(
        stats.emitted_by_kind.get(&EventKind::WorkflowStarted),
        Some(&1)
    );
    assert_eq!(
        stats.emitted_by_kind.get(&EventKind::WorkflowStepApproved),
        Some(&1)
    );
    assert_eq!(
        stats.emitted_by_kind.get(&EventKind::WorkflowCompleted),
        Some(&1)
    );
    assert_eq!(
        stats.emitted_by_kind.get(&EventKind::SlaBreachResponse),
        Some(&1)
    );
    // The audit sink listens on every kind
    assert_eq!(stats.handler_count, EventKind::ALL.len());
}

//! Periodic breach sweep over all active entities
//!
//! Each tick scans the three lifecycles through the store port, probes
//! every active entity against its thresholds, and emits one breach
//! event per overdue entity. An entity stays overdue across ticks and
//! is re-reported on every one of them; the sweeper keeps no memory
//! between ticks.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use vigil_bus::EventBus;
use vigil_store::WorkflowStore;
use vigil_types::{
    BreachKind, BreachSeverity, EngineEvent, EntitySnapshot, VigilConfig, WorkflowType,
};

use crate::evaluator::{live_breach_check, resolution_breach_check};

// ── Sweep Summary ────────────────────────────────────────────────────

/// What one sweep tick did, for operator logs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SweepSummary {
    /// Entities checked
    pub scanned: usize,
    /// Response breaches emitted
    pub response_breaches: usize,
    /// Resolution breaches emitted
    pub resolution_breaches: usize,
    /// Entities or type scans skipped because a read failed
    pub errors: usize,
    /// The tick ran out of budget before reaching every entity
    pub truncated: bool,
}

// ── Sweeper ──────────────────────────────────────────────────────────

/// Scans active entities and raises SLA breach events
///
/// The sweeper never fails a tick: read errors are logged, counted and
/// skipped. It holds no locks and shares nothing mutable with the
/// engine, so cancelling a tick mid-flight is safe.
pub struct SlaSweeper {
    store: Arc<dyn WorkflowStore>,
    bus: Arc<EventBus>,
    config: VigilConfig,
}

impl SlaSweeper {
    /// Create a sweeper over the given store and bus
    pub fn new(store: Arc<dyn WorkflowStore>, bus: Arc<EventBus>, config: VigilConfig) -> Self {
        Self { store, bus, config }
    }

    /// Run one sweep tick at the given instant.
    ///
    /// Scans every lifecycle, re-reads each candidate entity, and emits
    /// a breach event for each crossed deadline. Stops early once the
    /// configured budget is spent; whatever was not reached waits for
    /// the next tick.
    pub async fn sweep(&self, now: DateTime<Utc>) -> SweepSummary {
        let started = Instant::now();
        let budget = self.config.sweep.budget;
        let mut summary = SweepSummary::default();

        'types: for workflow in WorkflowType::ALL {
            let thresholds = self.config.sla.thresholds(workflow);
            let entities = match self.store.find_active_entities(workflow).await {
                Ok(entities) => entities,
                Err(error) => {
                    tracing::warn!(
                        workflow = %workflow,
                        error = %error,
                        "Sweep could not list active entities"
                    );
                    summary.errors += 1;
                    continue;
                }
            };

            for listed in entities {
                if started.elapsed() >= budget {
                    tracing::warn!(
                        scanned = summary.scanned,
                        "Sweep budget spent, remaining entities wait for the next tick"
                    );
                    summary.truncated = true;
                    break 'types;
                }

                // The list is a snapshot; timestamps are checked against
                // a fresh read of each row
                let entity = match self.store.load_entity(workflow, &listed.id).await {
                    Ok(Some(entity)) => entity,
                    Ok(None) => continue,
                    Err(error) => {
                        tracing::warn!(
                            entity = %listed.id,
                            workflow = %workflow,
                            error = %error,
                            "Sweep skipped an unreadable entity"
                        );
                        summary.errors += 1;
                        continue;
                    }
                };
                summary.scanned += 1;

                let response = live_breach_check(&entity, now, thresholds);
                if response.is_breached {
                    summary.response_breaches += 1;
                    self.emit_breach(
                        &entity,
                        BreachKind::Response,
                        response.minutes_elapsed,
                        thresholds.response_minutes,
                        now,
                    );
                }

                let resolution = resolution_breach_check(&entity, now, thresholds);
                if resolution.is_breached {
                    summary.resolution_breaches += 1;
                    self.emit_breach(
                        &entity,
                        BreachKind::Resolution,
                        resolution.minutes_elapsed,
                        thresholds.resolution_minutes,
                        now,
                    );
                }
            }
        }

        tracing::info!(
            scanned = summary.scanned,
            response_breaches = summary.response_breaches,
            resolution_breaches = summary.resolution_breaches,
            errors = summary.errors,
            truncated = summary.truncated,
            "Sweep finished"
        );
        summary
    }

    /// Sweep forever at the configured interval.
    ///
    /// For deployments driven by an external scheduler, call
    /// [`sweep`](Self::sweep) directly instead.
    pub async fn run(self) {
        let period = self.config.sweep.interval;
        tracing::info!(period_secs = period.as_secs(), "SLA sweeper running");
        loop {
            self.sweep(Utc::now()).await;
            tokio::time::sleep(period).await;
        }
    }

    fn emit_breach(
        &self,
        entity: &EntitySnapshot,
        kind: BreachKind,
        minutes_elapsed: i64,
        threshold_minutes: u32,
        at: DateTime<Utc>,
    ) {
        let severity = BreachSeverity::classify(entity.workflow, kind);
        tracing::warn!(
            entity = %entity.id,
            workflow = %entity.workflow,
            breach = ?kind,
            severity = %severity,
            minutes_elapsed,
            threshold_minutes,
            "SLA breach"
        );
        self.bus.emit(EngineEvent::SlaBreach {
            entity: entity.id.clone(),
            workflow: entity.workflow,
            subject: entity.subject.clone(),
            kind,
            severity,
            minutes_elapsed,
            threshold_minutes,
            at,
        });
    }
}

impl std::fmt::Debug for SlaSweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlaSweeper")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

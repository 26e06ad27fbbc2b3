//! Built-in audit logging sink
//!
//! Every domain event is worth a structured log line even before any
//! real consumer is wired up. Registration is explicit; nothing logs
//! until the hosting process opts in.

use crate::bus::EventBus;
use vigil_types::{EngineEvent, EventKind};

/// Subscribe a tracing-based audit logger to every event kind
///
/// Breach events log at `warn`, everything else at `info`.
pub fn register_audit_logging(bus: &EventBus) {
    bus.subscribe_all(|event| {
        match event {
            EngineEvent::SlaBreach {
                entity,
                workflow,
                kind,
                severity,
                minutes_elapsed,
                threshold_minutes,
                ..
            } => {
                tracing::warn!(
                    event = %event.kind(),
                    entity = %entity,
                    workflow = %workflow,
                    breach = ?kind,
                    severity = %severity,
                    minutes_elapsed,
                    threshold_minutes,
                    "SLA breach"
                );
            }
            EngineEvent::WorkflowStarted {
                instance_id,
                workflow,
                subject,
                initiator,
                ..
            } => {
                tracing::info!(
                    event = %EventKind::WorkflowStarted,
                    instance_id = %instance_id,
                    workflow = %workflow,
                    subject = %subject,
                    initiator = %initiator,
                    "Workflow started"
                );
            }
            EngineEvent::WorkflowStepApproved {
                instance_id,
                workflow,
                step,
                approver,
                ..
            } => {
                tracing::info!(
                    event = %EventKind::WorkflowStepApproved,
                    instance_id = %instance_id,
                    workflow = %workflow,
                    step,
                    approver = %approver,
                    "Workflow step approved"
                );
            }
            EngineEvent::WorkflowStepRejected {
                instance_id,
                workflow,
                step,
                approver,
                reason,
                ..
            } => {
                tracing::info!(
                    event = %EventKind::WorkflowStepRejected,
                    instance_id = %instance_id,
                    workflow = %workflow,
                    step,
                    approver = %approver,
                    reason = %reason,
                    "Workflow step rejected"
                );
            }
            EngineEvent::WorkflowCompleted {
                instance_id,
                workflow,
                status,
                ..
            } => {
                tracing::info!(
                    event = %EventKind::WorkflowCompleted,
                    instance_id = %instance_id,
                    workflow = %workflow,
                    status = %status,
                    "Workflow completed"
                );
            }
        }
        Ok(())
    });
}

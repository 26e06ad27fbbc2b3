//! Pure SLA arithmetic
//!
//! Everything here takes `now` as an argument and touches no clock, no
//! store, and no bus. Elapsed time is measured in whole minutes, rounded
//! half away from zero; breach comparisons are strictly greater-than, so
//! an entity sitting exactly on its threshold is not yet in breach.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use vigil_types::{EntitySnapshot, SlaThresholds};

/// Whole minutes between two instants, rounded half away from zero
pub fn elapsed_minutes(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let millis = (to - from).num_milliseconds();
    (millis as f64 / 60_000.0).round() as i64
}

// ── Recorded Metrics ─────────────────────────────────────────────────

/// How an entity performed against its thresholds
///
/// Minutes are `None` while the corresponding timestamp has not been
/// recorded, which keeps "not yet responded" distinguishable from
/// "responded instantly". A breach flag is only ever raised once the
/// matching timestamp exists; live overdue detection is
/// [`live_breach_check`]'s job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SlaMetrics {
    /// Minutes from creation to first response
    pub response_minutes: Option<i64>,
    /// Minutes from creation to resolution
    pub resolution_minutes: Option<i64>,
    /// Response came later than the threshold allows
    pub response_breached: bool,
    /// Resolution came later than the threshold allows
    pub resolution_breached: bool,
}

/// Measure recorded response and resolution times against thresholds
pub fn metrics(
    created_at: DateTime<Utc>,
    responded_at: Option<DateTime<Utc>>,
    resolved_at: Option<DateTime<Utc>>,
    thresholds: SlaThresholds,
) -> SlaMetrics {
    let response_minutes = responded_at.map(|at| elapsed_minutes(created_at, at));
    let resolution_minutes = resolved_at.map(|at| elapsed_minutes(created_at, at));
    SlaMetrics {
        response_minutes,
        resolution_minutes,
        response_breached: response_minutes
            .is_some_and(|m| m > i64::from(thresholds.response_minutes)),
        resolution_breached: resolution_minutes
            .is_some_and(|m| m > i64::from(thresholds.resolution_minutes)),
    }
}

// ── Live Checks ──────────────────────────────────────────────────────

/// Result of probing one entity against one deadline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BreachCheck {
    /// The deadline has been crossed
    pub is_breached: bool,
    /// Minutes since the entity was created, breached or not
    pub minutes_elapsed: i64,
}

/// Check an entity against its response deadline.
///
/// Breached iff the entity still sits in its type's awaiting-response
/// state, no response timestamp has been recorded, and the elapsed
/// minutes strictly exceed the response threshold.
pub fn live_breach_check(
    entity: &EntitySnapshot,
    now: DateTime<Utc>,
    thresholds: SlaThresholds,
) -> BreachCheck {
    let minutes_elapsed = elapsed_minutes(entity.created_at, now);
    let is_breached = entity.is_awaiting_response()
        && entity.responded_at.is_none()
        && minutes_elapsed > i64::from(thresholds.response_minutes);
    BreachCheck {
        is_breached,
        minutes_elapsed,
    }
}

/// Check an entity against its resolution deadline.
///
/// Applies to entities responded to but not yet resolved; elapsed time
/// still counts from creation, not from the response.
pub fn resolution_breach_check(
    entity: &EntitySnapshot,
    now: DateTime<Utc>,
    thresholds: SlaThresholds,
) -> BreachCheck {
    let minutes_elapsed = elapsed_minutes(entity.created_at, now);
    let is_breached = entity.is_awaiting_resolution()
        && minutes_elapsed > i64::from(thresholds.resolution_minutes);
    BreachCheck {
        is_breached,
        minutes_elapsed,
    }
}

// ── Derived Deadlines ────────────────────────────────────────────────

/// Due instants for one entity, derived and never stored
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SlaDeadlines {
    /// When a response is due
    pub response_due: DateTime<Utc>,
    /// When resolution is due
    pub resolution_due: DateTime<Utc>,
}

/// Deadlines for an entity created at the given instant
pub fn deadlines(created_at: DateTime<Utc>, thresholds: SlaThresholds) -> SlaDeadlines {
    SlaDeadlines {
        response_due: created_at + Duration::minutes(i64::from(thresholds.response_minutes)),
        resolution_due: created_at + Duration::minutes(i64::from(thresholds.resolution_minutes)),
    }
}

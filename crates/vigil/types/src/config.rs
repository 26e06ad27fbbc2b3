//! Static configuration consumed by the engine and the sweeper
//!
//! Defaults mirror the program's operating rules: a 15 minute response
//! window on SOS alerts, 60 minutes to resolution, a 7 day window for
//! verification visits, and a 30 day window for routine visits. The
//! config is supplied once at startup; nothing mutates it afterwards.

use crate::workflow::WorkflowType;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ── SLA Thresholds ───────────────────────────────────────────────────

/// Response and resolution deadlines for one lifecycle, in minutes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaThresholds {
    /// Minutes allowed before the entity must be responded to
    pub response_minutes: u32,
    /// Minutes allowed before the entity must be resolved
    pub resolution_minutes: u32,
}

impl SlaThresholds {
    pub fn new(response_minutes: u32, resolution_minutes: u32) -> Self {
        Self {
            response_minutes,
            resolution_minutes,
        }
    }
}

/// Per-type SLA thresholds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaConfig {
    /// SOS alerts: minutes to response / resolution
    pub sos: SlaThresholds,
    /// Field visits: routine visit window
    pub visit: SlaThresholds,
    /// Identity verification: verification visit window
    pub verification: SlaThresholds,
}

impl SlaConfig {
    /// Thresholds for a given lifecycle
    pub fn thresholds(&self, workflow: WorkflowType) -> SlaThresholds {
        match workflow {
            WorkflowType::Sos => self.sos,
            WorkflowType::Visit => self.visit,
            WorkflowType::Verification => self.verification,
        }
    }
}

impl Default for SlaConfig {
    fn default() -> Self {
        Self {
            // 15 minutes to respond, 60 to resolve
            sos: SlaThresholds::new(15, 60),
            // 30 days for a routine visit
            visit: SlaThresholds::new(43_200, 43_200),
            // 7 days for a verification visit
            verification: SlaThresholds::new(10_080, 10_080),
        }
    }
}

// ── Visit Durations ──────────────────────────────────────────────────

/// Allowed duration range for scheduling a field visit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitDurationRules {
    /// Shortest schedulable visit, minutes
    pub min_minutes: u32,
    /// Longest schedulable visit, minutes
    pub max_minutes: u32,
    /// Duration used when the caller does not specify one
    pub default_minutes: u32,
}

impl VisitDurationRules {
    /// Check a requested duration against the allowed range
    pub fn is_valid(&self, minutes: u32) -> bool {
        minutes >= self.min_minutes && minutes <= self.max_minutes
    }

    /// Resolve an optional requested duration, clamping into range
    pub fn resolve(&self, requested: Option<u32>) -> u32 {
        match requested {
            None => self.default_minutes,
            Some(m) => m.clamp(self.min_minutes, self.max_minutes),
        }
    }
}

impl Default for VisitDurationRules {
    fn default() -> Self {
        Self {
            min_minutes: 10,
            max_minutes: 480,
            default_minutes: 30,
        }
    }
}

// ── Sweep ────────────────────────────────────────────────────────────

/// Cadence and budget for the SLA sweeper
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// How often a sweep is triggered
    pub interval: Duration,
    /// Wall-clock budget for one tick; entities not reached before it
    /// expires wait for the next tick
    pub budget: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            budget: Duration::from_secs(30),
        }
    }
}

// ── Top-level Config ─────────────────────────────────────────────────

/// Everything the engine and sweeper consume at startup
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VigilConfig {
    /// Per-type SLA thresholds
    #[serde(default)]
    pub sla: SlaConfig,
    /// Sweep cadence and budget
    #[serde(default)]
    pub sweep: SweepConfig,
    /// Visit duration limits
    #[serde(default)]
    pub visit_durations: VisitDurationRules,
    /// How many alerts a single citizen may have open at once
    #[serde(default = "default_max_active_alerts")]
    pub max_active_alerts_per_subject: u32,
}

fn default_max_active_alerts() -> u32 {
    1
}

impl Default for VigilConfig {
    fn default() -> Self {
        Self {
            sla: SlaConfig::default(),
            sweep: SweepConfig::default(),
            visit_durations: VisitDurationRules::default(),
            max_active_alerts_per_subject: default_max_active_alerts(),
        }
    }
}

impl VigilConfig {
    /// Check whether a subject with `active` open alerts may raise another
    pub fn can_raise_alert(&self, active: u32) -> bool {
        active < self.max_active_alerts_per_subject
    }
}

use serde::{Deserialize, Serialize};

use crate::{MemoryMb, PlatformMode};

/// Snapshot of the real-time scheduler's accounting.
///
/// Recomputed on every read from the scheduler's histories; an engine that
/// has processed nothing reports the zeroed default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerMetrics {
    pub avg_response_ms: f64,
    pub min_response_ms: f64,
    pub max_response_ms: f64,
    /// `completed / total_submitted`, 0 when nothing was submitted.
    pub success_rate: f64,
    /// Tasks that missed their deadline, at admission or at completion.
    pub missed_deadlines: u64,
    /// Accepted submissions (rejections do not count).
    pub total_submitted: u64,
    pub completed: u64,
    pub failed: u64,
    pub running: u64,
    pub queued: u64,
}

/// Snapshot of the app lifecycle manager's accounting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppMetrics {
    pub avg_launch_ms: f64,
    pub min_launch_ms: f64,
    pub max_launch_ms: f64,
    pub running_apps: u64,
    pub memory_used_mb: MemoryMb,
    /// Usage against the configured ceiling, clamped into [0, 100].
    pub memory_used_pct: f64,
    pub pressure_events: u64,
    /// Most recent launches, oldest first, bounded capacity.
    pub recent_apps: Vec<String>,
}

/// Combined report returned by an engine or the coordinator.
///
/// Engines fill only their own section; the coordinator fills both plus the
/// composite health score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformMetrics {
    pub mode: PlatformMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<SchedulerMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apps: Option<AppMetrics>,
    /// Composite health score in [0, 100]; coordinator only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<u8>,
}

impl PlatformMetrics {
    pub fn scheduler_only(metrics: SchedulerMetrics) -> Self {
        Self {
            mode: PlatformMode::RealTime,
            scheduler: Some(metrics),
            apps: None,
            health: None,
        }
    }

    pub fn apps_only(metrics: AppMetrics) -> Self {
        Self {
            mode: PlatformMode::AppLifecycle,
            scheduler: None,
            apps: Some(metrics),
            health: None,
        }
    }
}

use std::time::Duration;

use serde::Deserialize;

use platsim_model::{MemoryMb, Millis, PlatformMode};

use crate::error::CoreError;

/// Knobs for the real-time scheduler.
///
/// All durations are carried as milliseconds so the struct deserializes from
/// plain config files; accessors return [`Duration`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// Minimum schedulable interval: below this much slack a task gets an
    /// urgency boost. One display frame in the original system.
    pub real_time_constraint_ms: Millis,
    /// Average response time above which the coordinator penalizes health.
    pub max_response_ms: Millis,
    /// Worker sleep when the queue is empty; also bounds how long `stop()`
    /// can take to be observed.
    pub idle_poll_ms: Millis,
    /// Amount subtracted from the ordering key of an urgent task.
    pub urgency_boost: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            real_time_constraint_ms: 16,
            max_response_ms: 100,
            idle_poll_ms: 1,
            urgency_boost: 10,
        }
    }
}

impl SchedulerConfig {
    pub fn real_time_constraint(&self) -> Duration {
        Duration::from_millis(self.real_time_constraint_ms)
    }

    pub fn max_response(&self) -> Duration {
        Duration::from_millis(self.max_response_ms)
    }

    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.idle_poll_ms == 0 {
            return Err(CoreError::invalid("idlePollMs", "must be > 0"));
        }
        if self.urgency_boost <= 0 {
            return Err(CoreError::invalid("urgencyBoost", "must be > 0"));
        }
        Ok(())
    }
}

/// Knobs for the app lifecycle manager.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LifecycleConfig {
    /// Memory ceiling the running set is accounted against.
    pub memory_limit_mb: MemoryMb,
    /// Base launch latency before jitter.
    pub launch_delay_ms: Millis,
    /// Whether `switch` is allowed at all.
    pub multitasking: bool,
    /// Minimum interval between reclamation passes.
    pub reclaim_interval_ms: Millis,
    /// Randomized per-app footprint range, inclusive.
    pub footprint_min_mb: MemoryMb,
    pub footprint_max_mb: MemoryMb,
    /// Randomized amount freed by one reclamation pass, inclusive.
    pub reclaim_min_mb: MemoryMb,
    pub reclaim_max_mb: MemoryMb,
    /// Randomized context-switch latency range, inclusive.
    pub switch_min_ms: Millis,
    pub switch_max_ms: Millis,
    /// Multiplicative jitter band applied to the base launch delay.
    pub jitter_min: f64,
    pub jitter_max: f64,
    /// Capacity of the recent-launch history ring.
    pub history_cap: usize,
    /// Usage fraction at which a reclamation pass is attempted.
    pub pressure_watermark: f64,
    /// Usage fraction at which a launch is refused after reclamation.
    pub refusal_watermark: f64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            memory_limit_mb: 2048,
            launch_delay_ms: 500,
            multitasking: true,
            reclaim_interval_ms: 5_000,
            footprint_min_mb: 50,
            footprint_max_mb: 200,
            reclaim_min_mb: 50,
            reclaim_max_mb: 200,
            switch_min_ms: 100,
            switch_max_ms: 300,
            jitter_min: 0.8,
            jitter_max: 1.2,
            history_cap: 10,
            pressure_watermark: 0.90,
            refusal_watermark: 0.95,
        }
    }
}

impl LifecycleConfig {
    pub fn launch_delay(&self) -> Duration {
        Duration::from_millis(self.launch_delay_ms)
    }

    pub fn reclaim_interval(&self) -> Duration {
        Duration::from_millis(self.reclaim_interval_ms)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.memory_limit_mb == 0 {
            return Err(CoreError::invalid("memoryLimitMb", "must be > 0"));
        }
        if self.footprint_min_mb > self.footprint_max_mb {
            return Err(CoreError::invalid("footprintMinMb", "min exceeds max"));
        }
        if self.reclaim_min_mb > self.reclaim_max_mb {
            return Err(CoreError::invalid("reclaimMinMb", "min exceeds max"));
        }
        if self.switch_min_ms > self.switch_max_ms {
            return Err(CoreError::invalid("switchMinMs", "min exceeds max"));
        }
        if !(self.jitter_min > 0.0 && self.jitter_min <= self.jitter_max) {
            return Err(CoreError::invalid("jitterMin", "band must be positive and ordered"));
        }
        if self.history_cap == 0 {
            return Err(CoreError::invalid("historyCap", "must be > 0"));
        }
        if !(0.0 < self.pressure_watermark && self.pressure_watermark <= 1.0) {
            return Err(CoreError::invalid("pressureWatermark", "must be in (0, 1]"));
        }
        if !(self.pressure_watermark <= self.refusal_watermark && self.refusal_watermark <= 1.0) {
            return Err(CoreError::invalid(
                "refusalWatermark",
                "must be in [pressureWatermark, 1]",
            ));
        }
        Ok(())
    }
}

/// Top-level configuration for the simulator facade.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlatformConfig {
    pub mode: PlatformMode,
    pub scheduler: SchedulerConfig,
    pub lifecycle: LifecycleConfig,
}

impl PlatformConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        self.scheduler.validate()?;
        self.lifecycle.validate()
    }
}

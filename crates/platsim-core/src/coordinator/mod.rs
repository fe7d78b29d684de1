//! Single submission surface over both engines plus the composite health
//! score.

use tracing::debug;

use platsim_model::{AppMetrics, PlatformHint, PlatformMetrics, PlatformMode, SchedulerMetrics};

use crate::{
    config::PlatformConfig, engine::Engine, lifecycle::AppLifecycleManager,
    scheduler::RealTimeScheduler, task::Task,
};

const MISSED_DEADLINE_PENALTY: u8 = 20;
const MEMORY_PRESSURE_PENALTY: u8 = 15;
const SLOW_RESPONSE_PENALTY: u8 = 10;
const MEMORY_PCT_THRESHOLD: f64 = 80.0;

/// Routes tasks to one of the engines and folds their metrics into a single
/// assessment.
#[derive(Clone)]
pub struct PlatformCoordinator {
    scheduler: RealTimeScheduler,
    apps: AppLifecycleManager,
    max_response_ms: f64,
}

impl PlatformCoordinator {
    pub fn new(cfg: &PlatformConfig) -> Self {
        Self {
            scheduler: RealTimeScheduler::new(cfg.scheduler.clone()),
            apps: AppLifecycleManager::new(cfg.lifecycle.clone()),
            max_response_ms: cfg.scheduler.max_response_ms as f64,
        }
    }

    pub fn scheduler(&self) -> &RealTimeScheduler {
        &self.scheduler
    }

    pub fn apps(&self) -> &AppLifecycleManager {
        &self.apps
    }

    /// Submit a task, routing by the hint.
    ///
    /// Under `Auto`, the two highest tiers go to the real-time scheduler and
    /// everything else becomes an app launch keyed by the task's name and id.
    pub fn submit(&self, task: Task, hint: PlatformHint) -> bool {
        let to_scheduler = match hint {
            PlatformHint::Auto => task.priority.is_realtime(),
            PlatformHint::RealTime => true,
            PlatformHint::AppLifecycle => false,
        };
        debug!(task = %task.name, ?hint, to_scheduler, "routing task");

        if to_scheduler {
            self.scheduler.submit(task)
        } else {
            // The task's name/id become the app identity on this path.
            let Task { name, id, .. } = task;
            self.apps.launch(&name, id)
        }
    }

    /// Both engines' metrics plus the composite health score.
    pub fn performance_metrics(&self) -> PlatformMetrics {
        let scheduler = self.scheduler.performance_metrics();
        let apps = self.apps.performance_metrics();
        let health = composite_health(&scheduler, &apps, self.max_response_ms);

        PlatformMetrics {
            mode: PlatformMode::Hybrid,
            scheduler: Some(scheduler),
            apps: Some(apps),
            health: Some(health),
        }
    }
}

/// Additive-penalty health score over both engines, clamped to [0, 100].
///
/// Penalties are independent: any missed deadline, app memory above 80%,
/// average response above the configured threshold.
fn composite_health(scheduler: &SchedulerMetrics, apps: &AppMetrics, max_response_ms: f64) -> u8 {
    let mut penalty: u8 = 0;
    if scheduler.missed_deadlines > 0 {
        penalty += MISSED_DEADLINE_PENALTY;
    }
    if apps.memory_used_pct > MEMORY_PCT_THRESHOLD {
        penalty += MEMORY_PRESSURE_PENALTY;
    }
    if scheduler.avg_response_ms > max_response_ms {
        penalty += SLOW_RESPONSE_PENALTY;
    }
    100u8.saturating_sub(penalty)
}

impl Engine for PlatformCoordinator {
    fn start(&self) {
        self.scheduler.start();
    }

    fn stop(&self) {
        self.scheduler.stop();
    }

    fn submit(&self, task: Task, hint: PlatformHint) -> bool {
        PlatformCoordinator::submit(self, task, hint)
    }

    fn metrics(&self) -> PlatformMetrics {
        self.performance_metrics()
    }
}

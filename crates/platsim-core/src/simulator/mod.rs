//! Mode-selecting facade over the three engines.

use std::time::Instant;

use tracing::info;

use platsim_model::{PlatformHint, PlatformMetrics, PlatformMode, TaskSpec};

use crate::{
    config::PlatformConfig, coordinator::PlatformCoordinator, engine::Engine, error::CoreError,
    lifecycle::AppLifecycleManager, scheduler::RealTimeScheduler, task::Task,
};

/// Facade selecting exactly one engine at construction time and forwarding
/// the uniform surface to it.
pub struct PlatformSimulator {
    mode: PlatformMode,
    engine: Box<dyn Engine>,
}

impl PlatformSimulator {
    /// Validate the config and construct the engine for its mode.
    pub fn new(cfg: PlatformConfig) -> Result<Self, CoreError> {
        cfg.validate()?;

        let engine: Box<dyn Engine> = match cfg.mode {
            PlatformMode::RealTime => Box::new(RealTimeScheduler::new(cfg.scheduler)),
            PlatformMode::AppLifecycle => Box::new(AppLifecycleManager::new(cfg.lifecycle)),
            PlatformMode::Hybrid => Box::new(PlatformCoordinator::new(&cfg)),
        };

        info!(mode = %cfg.mode, "platform simulator initialized");
        Ok(Self {
            mode: cfg.mode,
            engine,
        })
    }

    pub fn mode(&self) -> PlatformMode {
        self.mode
    }

    /// Resolve a spec into a task against the clock now, filling in the
    /// default deadline when the spec carries none.
    pub fn create_task(&self, spec: TaskSpec) -> Task {
        Task::from_spec(spec, Instant::now())
    }

    pub fn start(&self) {
        self.engine.start();
    }

    pub fn stop(&self) {
        self.engine.stop();
    }

    pub fn submit(&self, task: Task, hint: PlatformHint) -> bool {
        self.engine.submit(task, hint)
    }

    pub fn performance_metrics(&self) -> PlatformMetrics {
        self.engine.metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use platsim_model::TaskPriority;

    fn sim(mode: PlatformMode) -> PlatformSimulator {
        let mut cfg = PlatformConfig {
            mode,
            ..Default::default()
        };
        cfg.lifecycle.launch_delay_ms = 1;
        PlatformSimulator::new(cfg).unwrap()
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let mut cfg = PlatformConfig::default();
        cfg.lifecycle.memory_limit_mb = 0;
        assert!(PlatformSimulator::new(cfg).is_err());
    }

    #[test]
    fn realtime_mode_reports_scheduler_section_only() {
        let m = sim(PlatformMode::RealTime).performance_metrics();
        assert!(m.scheduler.is_some());
        assert!(m.apps.is_none());
        assert!(m.health.is_none());
    }

    #[test]
    fn lifecycle_mode_reports_apps_section_only() {
        let m = sim(PlatformMode::AppLifecycle).performance_metrics();
        assert!(m.scheduler.is_none());
        assert!(m.apps.is_some());
        assert!(m.health.is_none());
    }

    #[test]
    fn hybrid_mode_reports_both_and_health() {
        let m = sim(PlatformMode::Hybrid).performance_metrics();
        assert!(m.scheduler.is_some());
        assert!(m.apps.is_some());
        assert_eq!(m.health, Some(100));
    }

    #[test]
    fn create_task_fills_default_deadline() {
        let sim = sim(PlatformMode::Hybrid);
        let before = Instant::now();
        let task = sim.create_task(TaskSpec::new("probe").with_execution_time_ms(40));

        assert!(task.deadline >= before + Duration::from_millis(80));
    }

    #[test]
    fn end_to_end_hybrid_round() {
        let sim = sim(PlatformMode::Hybrid);
        sim.start();

        let rt = sim.create_task(
            TaskSpec::new("airbag")
                .with_priority(TaskPriority::Critical)
                .with_execution_time_ms(10)
                .with_deadline_ms(2_000),
        );
        let app = sim.create_task(TaskSpec::new("media").with_priority(TaskPriority::Low));

        assert!(sim.submit(rt, PlatformHint::Auto));
        assert!(sim.submit(app, PlatformHint::Auto));

        std::thread::sleep(Duration::from_millis(300));
        sim.stop();

        let m = sim.performance_metrics();
        let sched = m.scheduler.unwrap();
        assert_eq!(sched.total_submitted, 1);
        assert_eq!(sched.completed, 1);
        assert_eq!(m.apps.unwrap().running_apps, 1);
        assert_eq!(m.health, Some(100));
    }

    #[test]
    fn facade_start_stop_idempotent_across_modes() {
        for mode in [
            PlatformMode::RealTime,
            PlatformMode::AppLifecycle,
            PlatformMode::Hybrid,
        ] {
            let sim = sim(mode);
            sim.start();
            sim.start();
            sim.stop();
            sim.stop();
        }
    }
}

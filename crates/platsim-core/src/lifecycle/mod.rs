//! Memory-bounded app lifecycle engine with simulated reclamation.
//!
//! Launching costs latency and memory; sustained pressure triggers a
//! rate-limited reclamation pass, and a launch is refused when usage stays
//! above the refusal watermark afterwards. All operations are synchronous on
//! the calling thread.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{info, warn};

use platsim_model::{AppMetrics, MemoryMb, PlatformHint, PlatformMetrics, TaskId};

use crate::{config::LifecycleConfig, engine::Engine, task::Task};

/// A running app and the resources it occupies.
#[derive(Debug, Clone)]
struct AppRecord {
    name: String,
    footprint_mb: MemoryMb,
    started_at: Instant,
}

struct LifecycleState {
    running: HashMap<TaskId, AppRecord>,
    /// Sum of running footprints, the authoritative usage figure.
    used_mb: MemoryMb,
    last_reclaim: Option<Instant>,
    pressure_events: u64,
    launch_latencies: Vec<Duration>,
    /// Recent launches, oldest first, bounded by `history_cap`.
    history: VecDeque<String>,
}

/// Memory-bounded launch/close/switch engine.
///
/// Clone-able handle; clones share the same state.
#[derive(Clone)]
pub struct AppLifecycleManager {
    inner: Arc<Inner>,
}

struct Inner {
    cfg: LifecycleConfig,
    state: Mutex<LifecycleState>,
}

impl AppLifecycleManager {
    pub fn new(cfg: LifecycleConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                cfg,
                state: Mutex::new(LifecycleState {
                    running: HashMap::new(),
                    used_mb: 0,
                    last_reclaim: None,
                    pressure_events: 0,
                    launch_latencies: Vec::new(),
                    history: VecDeque::new(),
                }),
            }),
        }
    }

    /// Launch an app, blocking the caller for the simulated launch latency.
    ///
    /// Returns `false` when usage is still at or above the refusal watermark
    /// after a reclamation attempt.
    pub fn launch(&self, name: &str, id: TaskId) -> bool {
        let cfg = &self.inner.cfg;

        let (latency, footprint) = {
            let mut state = self.inner.state.lock().unwrap();

            let pressure_at = watermark_mb(cfg.memory_limit_mb, cfg.pressure_watermark);
            if state.used_mb >= pressure_at {
                warn!(app = name, used_mb = state.used_mb, "memory pressure, attempting reclamation");
                reclaim(&mut state, cfg);

                let refusal_at = watermark_mb(cfg.memory_limit_mb, cfg.refusal_watermark);
                if state.used_mb >= refusal_at {
                    warn!(app = name, used_mb = state.used_mb, "launch refused: insufficient memory");
                    return false;
                }
            }

            let mut rng = rand::thread_rng();
            let jitter = rng.gen_range(cfg.jitter_min..=cfg.jitter_max);
            let footprint = rng.gen_range(cfg.footprint_min_mb..=cfg.footprint_max_mb);

            // Reserve the footprint before sleeping so launches admitted
            // concurrently see each other's usage at the watermark check.
            state.used_mb += footprint;

            (cfg.launch_delay().mul_f64(jitter), footprint)
        };

        // Lock released: the latency blocks only this caller.
        thread::sleep(latency);

        let mut state = self.inner.state.lock().unwrap();
        state.launch_latencies.push(latency);
        if state.history.len() == cfg.history_cap {
            state.history.pop_front();
        }
        state.history.push_back(name.to_string());

        let record = AppRecord {
            name: name.to_string(),
            footprint_mb: footprint,
            started_at: Instant::now(),
        };
        if let Some(old) = state.running.insert(id, record) {
            // Relaunch under the same id replaces the old instance.
            state.used_mb = state.used_mb.saturating_sub(old.footprint_mb);
        }

        info!(app = name, ?latency, footprint_mb = footprint, "app launched");
        true
    }

    /// Close an app, returning its footprint to the pool. `false` for an
    /// unknown id.
    pub fn close(&self, id: &TaskId) -> bool {
        let mut state = self.inner.state.lock().unwrap();
        match state.running.remove(id) {
            Some(app) => {
                state.used_mb = state.used_mb.saturating_sub(app.footprint_mb);
                info!(
                    app = %app.name,
                    freed_mb = app.footprint_mb,
                    uptime = ?app.started_at.elapsed(),
                    "app closed"
                );
                true
            }
            None => false,
        }
    }

    /// Switch to a running app, blocking for a short randomized latency.
    pub fn switch(&self, id: &TaskId) -> bool {
        let cfg = &self.inner.cfg;
        if !cfg.multitasking {
            warn!("switch refused: multitasking disabled");
            return false;
        }

        let name = {
            let state = self.inner.state.lock().unwrap();
            state.running.get(id).map(|app| app.name.clone())
        };
        let Some(name) = name else {
            warn!(%id, "switch refused: app not running");
            return false;
        };

        let delay_ms = rand::thread_rng().gen_range(cfg.switch_min_ms..=cfg.switch_max_ms);
        thread::sleep(Duration::from_millis(delay_ms));

        info!(app = %name, delay_ms, "switched app");
        true
    }

    /// Recompute metrics from the current state. Zeroed when nothing has
    /// launched; the reported percentage is always within [0, 100].
    pub fn performance_metrics(&self) -> AppMetrics {
        let cfg = &self.inner.cfg;
        let state = self.inner.state.lock().unwrap();

        let pct = (state.used_mb as f64 / cfg.memory_limit_mb as f64 * 100.0).clamp(0.0, 100.0);
        let mut metrics = AppMetrics {
            running_apps: state.running.len() as u64,
            memory_used_mb: state.used_mb,
            memory_used_pct: pct,
            pressure_events: state.pressure_events,
            recent_apps: state.history.iter().cloned().collect(),
            ..Default::default()
        };

        if !state.launch_latencies.is_empty() {
            let ms: Vec<f64> = state
                .launch_latencies
                .iter()
                .map(|d| d.as_secs_f64() * 1_000.0)
                .collect();
            metrics.avg_launch_ms = ms.iter().sum::<f64>() / ms.len() as f64;
            metrics.min_launch_ms = ms.iter().cloned().fold(f64::INFINITY, f64::min);
            metrics.max_launch_ms = ms.iter().cloned().fold(0.0, f64::max);
        }

        metrics
    }
}

fn watermark_mb(limit: MemoryMb, fraction: f64) -> MemoryMb {
    (limit as f64 * fraction) as MemoryMb
}

/// Reclamation pass: free a pseudo-random amount, rate-limited by the
/// configured interval. Repeated pressure inside the window is a no-op and
/// does not count as a pressure event.
fn reclaim(state: &mut LifecycleState, cfg: &LifecycleConfig) {
    let now = Instant::now();
    if let Some(last) = state.last_reclaim {
        if now.duration_since(last) < cfg.reclaim_interval() {
            return;
        }
    }

    let freed = rand::thread_rng().gen_range(cfg.reclaim_min_mb..=cfg.reclaim_max_mb);
    state.used_mb = state.used_mb.saturating_sub(freed);
    state.last_reclaim = Some(now);
    state.pressure_events += 1;
    info!(freed_mb = freed, "reclamation pass completed");
}

impl Engine for AppLifecycleManager {
    fn start(&self) {
        // No background work: all operations run on the calling thread.
    }

    fn stop(&self) {}

    fn submit(&self, task: Task, _hint: PlatformHint) -> bool {
        self.launch(&task.name, task.id)
    }

    fn metrics(&self) -> PlatformMetrics {
        PlatformMetrics::apps_only(self.performance_metrics())
    }
}

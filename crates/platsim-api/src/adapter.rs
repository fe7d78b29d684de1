use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use platsim_core::PlatformSimulator;
use platsim_model::{PlatformHint, PlatformMetrics, TaskId, TaskSpec};

use crate::error::ApiError;
use crate::handler::ApiHandler;

/// Adapter that bridges [`PlatformSimulator`] to [`ApiHandler`].
///
/// The core is synchronous and its submissions may block for simulated
/// latencies, so calls are moved off the async runtime via `spawn_blocking`.
pub struct SimulatorAdapter {
    simulator: Arc<PlatformSimulator>,
}

impl SimulatorAdapter {
    pub fn new(simulator: Arc<PlatformSimulator>) -> Self {
        Self { simulator }
    }
}

#[async_trait]
impl ApiHandler for SimulatorAdapter {
    async fn submit_task(&self, spec: TaskSpec, hint: PlatformHint) -> Result<TaskId, ApiError> {
        let sim = Arc::clone(&self.simulator);
        let accepted = tokio::task::spawn_blocking(move || {
            let task = sim.create_task(spec);
            let id = task.id.clone();
            (sim.submit(task, hint), id)
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

        match accepted {
            (true, id) => {
                debug!(task_id = %id, "task accepted");
                Ok(id)
            }
            (false, id) => {
                warn!(task_id = %id, "submission refused by engine");
                Err(ApiError::SubmissionRefused)
            }
        }
    }

    async fn metrics(&self) -> Result<PlatformMetrics, ApiError> {
        Ok(self.simulator.performance_metrics())
    }

    async fn start(&self) -> Result<(), ApiError> {
        self.simulator.start();
        Ok(())
    }

    async fn stop(&self) -> Result<(), ApiError> {
        let sim = Arc::clone(&self.simulator);
        // stop() joins the worker; keep that wait off the runtime.
        tokio::task::spawn_blocking(move || sim.stop())
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))
    }
}

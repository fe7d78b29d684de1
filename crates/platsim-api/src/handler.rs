use async_trait::async_trait;

use platsim_model::{PlatformHint, PlatformMetrics, TaskId, TaskSpec};

use crate::error::ApiError;

/// Simulation control API handler.
///
/// Abstracts the backend so the transport can be tested against a stub and
/// users can wrap the provided [`crate::SimulatorAdapter`] with extra logic.
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    /// Submit a task spec for execution; returns the generated task id.
    async fn submit_task(&self, spec: TaskSpec, hint: PlatformHint) -> Result<TaskId, ApiError>;

    /// Snapshot the active engine's metrics.
    async fn metrics(&self) -> Result<PlatformMetrics, ApiError>;

    /// Start background work. Idempotent.
    async fn start(&self) -> Result<(), ApiError>;

    /// Stop background work. Idempotent.
    async fn stop(&self) -> Result<(), ApiError>;
}

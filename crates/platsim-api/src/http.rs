use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use platsim_model::{PlatformHint, PlatformMetrics, TaskSpec};

use crate::{error::ApiError, handler::ApiHandler};

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build an axum router with the control endpoints mounted.
    ///
    /// Routes:
    /// - POST /api/v1/tasks - Submit a task spec
    /// - GET  /api/v1/metrics - Combined metrics snapshot
    /// - POST /api/v1/lifecycle/start - Start background work
    /// - POST /api/v1/lifecycle/stop - Stop background work
    pub fn router(self) -> Router {
        Router::new()
            .route("/api/v1/tasks", post(submit_task::<H>))
            .route("/api/v1/metrics", get(get_metrics::<H>))
            .route("/api/v1/lifecycle/start", post(start::<H>))
            .route("/api/v1/lifecycle/stop", post(stop::<H>))
            .with_state(self.handler)
    }
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct SubmitTaskRequest {
    spec: TaskSpec,
    #[serde(default)]
    platform: PlatformHint,
}

#[derive(Debug, Serialize, Deserialize)]
struct SubmitTaskResponse {
    task_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct MetricsResponse {
    metrics: PlatformMetrics,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/tasks
async fn submit_task<H>(
    State(handler): State<Arc<H>>,
    Json(req): Json<SubmitTaskRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    if req.spec.name.is_empty() {
        return Err(ApiError::InvalidRequest("task name must not be empty".into()));
    }

    let task_id = handler.submit_task(req.spec, req.platform).await?;
    Ok(Json(SubmitTaskResponse {
        task_id: task_id.to_string(),
    }))
}

/// GET /api/v1/metrics
async fn get_metrics<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let metrics = handler.metrics().await?;
    Ok(Json(MetricsResponse { metrics }))
}

/// POST /api/v1/lifecycle/start
async fn start<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    handler.start().await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// POST /api/v1/lifecycle/stop
async fn stop<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    handler.stop().await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

use serde::{Deserialize, Serialize};

/// Current execution state of a task.
///
/// Transitions are monotonic: `Pending` → `Running` → `Completed` or
/// `Failed`, never backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    /// Task is queued, waiting for the worker.
    Pending,
    /// Task is currently occupying the execution unit.
    Running,
    /// Task finished within its deadline.
    Completed,
    /// Task missed its deadline or faulted during execution.
    Failed,
}

impl TaskStatus {
    /// Returns `true` if the task is in a terminal state (won't transition further).
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    /// Returns `true` if the task is still active (pending or running).
    pub fn is_active(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::Running)
    }
}

use std::time::{Duration, Instant};

use platsim_model::{MemoryMb, TaskId, TaskPriority, TaskSpec, TaskStatus};

/// A [`TaskSpec`] resolved against the monotonic clock.
///
/// Created by a caller (via [`crate::PlatformSimulator::create_task`]),
/// owned by whichever engine accepts it; moved into a terminal history once
/// completed or failed.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub priority: TaskPriority,
    pub execution_time: Duration,
    /// Absolute completion deadline.
    pub deadline: Instant,
    pub memory_mb: MemoryMb,
    pub cpu_share: f64,
    pub created_at: Instant,
    pub status: TaskStatus,
}

impl Task {
    /// Resolve a spec at `now`, generating a fresh id.
    ///
    /// A spec without a deadline gets `now + 2 × execution_time`.
    pub fn from_spec(spec: TaskSpec, now: Instant) -> Self {
        let execution_time = Duration::from_millis(spec.execution_time_ms);
        let deadline = match spec.deadline_ms {
            Some(ms) => now + Duration::from_millis(ms),
            None => now + 2 * execution_time,
        };

        Self {
            id: TaskId::new(uuid::Uuid::new_v4().to_string()),
            name: spec.name,
            priority: spec.priority,
            execution_time,
            deadline,
            memory_mb: spec.memory_mb,
            cpu_share: spec.cpu_share,
            created_at: now,
            status: TaskStatus::Pending,
        }
    }

    /// Time remaining until the deadline, zero once elapsed.
    pub fn slack(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }
}

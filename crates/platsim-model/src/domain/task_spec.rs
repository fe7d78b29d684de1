use serde::{Deserialize, Serialize};

use crate::{MemoryMb, Millis, TaskPriority};

const DEFAULT_EXECUTION_MS: Millis = 100;
const DEFAULT_MEMORY_MB: MemoryMb = 100;
const DEFAULT_CPU_SHARE: f64 = 0.1;

/// Public submission record for a synthetic task.
///
/// Times are relative to the moment of submission; the engine resolves them
/// against its monotonic clock. When `deadline_ms` is omitted, the engine
/// fills in `2 × execution_time_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    /// Display name; doubles as the app name on the lifecycle path.
    pub name: String,
    /// Priority tier.
    #[serde(default)]
    pub priority: TaskPriority,
    /// Time the execution unit is occupied while running the task.
    #[serde(default = "default_execution_ms")]
    pub execution_time_ms: Millis,
    /// Completion deadline, relative to submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_ms: Option<Millis>,
    /// Declared memory footprint (advisory).
    #[serde(default = "default_memory_mb")]
    pub memory_mb: MemoryMb,
    /// Declared CPU share in [0, 1] (advisory, not enforced).
    #[serde(default = "default_cpu_share")]
    pub cpu_share: f64,
}

fn default_execution_ms() -> Millis {
    DEFAULT_EXECUTION_MS
}

fn default_memory_mb() -> MemoryMb {
    DEFAULT_MEMORY_MB
}

fn default_cpu_share() -> f64 {
    DEFAULT_CPU_SHARE
}

impl TaskSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: TaskPriority::default(),
            execution_time_ms: DEFAULT_EXECUTION_MS,
            deadline_ms: None,
            memory_mb: DEFAULT_MEMORY_MB,
            cpu_share: DEFAULT_CPU_SHARE,
        }
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_execution_time_ms(mut self, ms: Millis) -> Self {
        self.execution_time_ms = ms;
        self
    }

    pub fn with_deadline_ms(mut self, ms: Millis) -> Self {
        self.deadline_ms = Some(ms);
        self
    }

    pub fn with_memory_mb(mut self, mb: MemoryMb) -> Self {
        self.memory_mb = mb;
        self
    }

    pub fn with_cpu_share(mut self, share: f64) -> Self {
        self.cpu_share = share;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let spec = TaskSpec::new("brake-check")
            .with_priority(TaskPriority::Critical)
            .with_execution_time_ms(10)
            .with_deadline_ms(1_000)
            .with_memory_mb(64)
            .with_cpu_share(0.5);

        assert_eq!(spec.name, "brake-check");
        assert_eq!(spec.priority, TaskPriority::Critical);
        assert_eq!(spec.execution_time_ms, 10);
        assert_eq!(spec.deadline_ms, Some(1_000));
        assert_eq!(spec.memory_mb, 64);
        assert_eq!(spec.cpu_share, 0.5);
    }

    #[test]
    fn deserializes_with_defaults() {
        let spec: TaskSpec = serde_json::from_str(r#"{"name":"media"}"#).unwrap();
        assert_eq!(spec.priority, TaskPriority::Normal);
        assert_eq!(spec.execution_time_ms, 100);
        assert_eq!(spec.deadline_ms, None);
        assert_eq!(spec.memory_mb, 100);
    }

    #[test]
    fn omitted_deadline_not_serialized() {
        let json = serde_json::to_string(&TaskSpec::new("nav")).unwrap();
        assert!(!json.contains("deadlineMs"));
    }
}

use serde::{Deserialize, Serialize};

/// Priority tier of a submitted task.
///
/// Tiers are totally ordered: `Critical` outranks everything, `Background`
/// nothing. The scheduler derives its ordering key from [`TaskPriority::rank`],
/// where a lower rank means higher precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskPriority {
    Critical,
    High,
    Normal,
    Low,
    Background,
}

impl TaskPriority {
    /// Numeric tier, 0 (highest precedence) through 4 (lowest).
    pub fn rank(&self) -> i64 {
        match self {
            TaskPriority::Critical => 0,
            TaskPriority::High => 1,
            TaskPriority::Normal => 2,
            TaskPriority::Low => 3,
            TaskPriority::Background => 4,
        }
    }

    /// Returns `true` for the tiers the coordinator routes to the
    /// real-time scheduler when no explicit hint is given.
    pub fn is_realtime(&self) -> bool {
        matches!(self, TaskPriority::Critical | TaskPriority::High)
    }

    /// Tier ordering: `a.outranks(b)` when `a` takes precedence over `b`.
    pub fn outranks(&self, other: &TaskPriority) -> bool {
        self.rank() < other.rank()
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Normal
    }
}

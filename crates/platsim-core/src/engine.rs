use platsim_model::{PlatformHint, PlatformMetrics};

use crate::task::Task;

/// Uniform surface over the three engine variants.
///
/// The facade holds a single `Box<dyn Engine>` and forwards to it regardless
/// of which concrete engine was selected at construction time.
pub trait Engine: Send + Sync {
    /// Spawn background work, if the engine has any. Idempotent.
    fn start(&self);

    /// Signal background work to exit and wait for it. Idempotent; never
    /// aborts a task that is mid-execution.
    fn stop(&self);

    /// Hand a task to the engine. Returns `false` when the engine refuses it
    /// (elapsed deadline, memory refusal, unknown route).
    fn submit(&self, task: Task, hint: PlatformHint) -> bool;

    /// Snapshot the engine's accounting. Safe to call concurrently with
    /// running work; zeroed when nothing has been processed.
    fn metrics(&self) -> PlatformMetrics;
}

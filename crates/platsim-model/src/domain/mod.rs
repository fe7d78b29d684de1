mod task_id;
pub use task_id::TaskId;

mod priority;
pub use priority::TaskPriority;

mod task_status;
pub use task_status::TaskStatus;

mod task_spec;
pub use task_spec::TaskSpec;

mod platform;
pub use platform::{PlatformHint, PlatformMode};

mod metrics;
pub use metrics::{AppMetrics, PlatformMetrics, SchedulerMetrics};

/// Memory amount in megabytes.
///
/// Used wherever the lifecycle manager accounts footprints against its ceiling.
pub type MemoryMb = u64;

/// Duration value in milliseconds.
///
/// Used in submission specs and configuration where an explicit time knob is required.
pub type Millis = u64;

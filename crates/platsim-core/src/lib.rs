//! Simulation engines for dual-platform workload evaluation.
//!
//! Two engines model the two execution platforms: [`RealTimeScheduler`]
//! (deadline-driven, single effective real-time unit) and
//! [`AppLifecycleManager`] (memory-bounded launch/close/switch).
//! [`PlatformCoordinator`] routes between them and folds their metrics into
//! a composite health score; [`PlatformSimulator`] is the mode-selecting
//! facade over all three.

pub mod error;
pub use error::CoreError;

pub mod config;
pub use config::{LifecycleConfig, PlatformConfig, SchedulerConfig};

mod task;
pub use task::Task;

mod engine;
pub use engine::Engine;

pub mod scheduler;
pub use scheduler::RealTimeScheduler;

pub mod lifecycle;
pub use lifecycle::AppLifecycleManager;

pub mod coordinator;
pub use coordinator::PlatformCoordinator;

pub mod simulator;
pub use simulator::PlatformSimulator;

//! Deadline-driven scheduler modeling one effective real-time execution unit.
//!
//! A single background worker consumes a priority queue; submission is safe
//! from any number of threads. Execution is strictly serial and
//! non-preemptive: once a task starts it always runs to natural completion.
//! Multi-core parallelism is deliberately not modeled.

use std::cmp::{Ordering as CmpOrdering, Reverse};
use std::collections::BinaryHeap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use platsim_model::{PlatformHint, PlatformMetrics, SchedulerMetrics, TaskStatus};

use crate::{config::SchedulerConfig, engine::Engine, task::Task};

/// Queue entry ordered by `(ordering_key, submission_seq)`.
///
/// Lower key runs first; the sequence number breaks ties FIFO.
struct QueueEntry {
    key: i64,
    seq: u64,
    submitted_at: Instant,
    task: Task,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        (self.key, self.seq).cmp(&(other.key, other.seq))
    }
}

#[derive(Default)]
struct SchedStats {
    response_times: Vec<Duration>,
    missed_deadlines: u64,
    total_submitted: u64,
    completed: Vec<Task>,
    failed: Vec<Task>,
    /// Whether the worker currently occupies the unit with a task.
    executing: bool,
}

struct Shared {
    cfg: SchedulerConfig,
    /// The only structure shared between producers and the worker.
    queue: Mutex<BinaryHeap<Reverse<QueueEntry>>>,
    /// Histories written by the worker, read by metrics snapshots.
    stats: Mutex<SchedStats>,
    running: AtomicBool,
    seq: AtomicU64,
    worker: Mutex<Option<JoinHandle<()>>>,
}

/// Single-worker, priority-ordered, deadline-aware execution engine.
///
/// Clone-able handle; clones share the same state.
#[derive(Clone)]
pub struct RealTimeScheduler {
    inner: Arc<Shared>,
}

impl RealTimeScheduler {
    pub fn new(cfg: SchedulerConfig) -> Self {
        Self {
            inner: Arc::new(Shared {
                cfg,
                queue: Mutex::new(BinaryHeap::new()),
                stats: Mutex::new(SchedStats::default()),
                running: AtomicBool::new(false),
                seq: AtomicU64::new(0),
                worker: Mutex::new(None),
            }),
        }
    }

    /// Spawn the worker. A second call while already running is a no-op.
    pub fn start(&self) {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            return;
        }
        let shared = Arc::clone(&self.inner);
        let handle = thread::spawn(move || worker_loop(shared));
        *self.inner.worker.lock().unwrap() = Some(handle);
        info!("real-time scheduler started");
    }

    /// Signal the worker to exit and wait for it to return.
    ///
    /// A task mid-execution always finishes first; the idle-poll interval
    /// bounds how long an idle worker takes to observe the signal.
    pub fn stop(&self) {
        self.inner.running.store(false, Ordering::SeqCst);
        let handle = self.inner.worker.lock().unwrap().take();
        if let Some(handle) = handle {
            let _ = handle.join();
            info!("real-time scheduler stopped");
        }
    }

    /// Enqueue a task. Returns `false` without touching any counter when the
    /// deadline has already elapsed.
    pub fn submit(&self, task: Task) -> bool {
        let now = Instant::now();
        // Strictly elapsed: a deadline of exactly `now` is still admissible.
        if task.deadline < now {
            warn!(task = %task.name, "task rejected: deadline already elapsed");
            return false;
        }

        let key = ordering_key(&task, now, &self.inner.cfg);
        let seq = self.inner.seq.fetch_add(1, Ordering::Relaxed);
        debug!(task = %task.name, key, seq, "task submitted");

        self.inner.queue.lock().unwrap().push(Reverse(QueueEntry {
            key,
            seq,
            submitted_at: now,
            task,
        }));
        self.inner.stats.lock().unwrap().total_submitted += 1;
        true
    }

    /// Recompute metrics from the histories. Zeroed when nothing has run.
    pub fn performance_metrics(&self) -> SchedulerMetrics {
        let queued = self.inner.queue.lock().unwrap().len() as u64;
        let stats = self.inner.stats.lock().unwrap();

        let mut metrics = SchedulerMetrics {
            missed_deadlines: stats.missed_deadlines,
            total_submitted: stats.total_submitted,
            completed: stats.completed.len() as u64,
            failed: stats.failed.len() as u64,
            running: stats.executing as u64,
            queued,
            ..Default::default()
        };

        if !stats.response_times.is_empty() {
            let ms: Vec<f64> = stats
                .response_times
                .iter()
                .map(|d| d.as_secs_f64() * 1_000.0)
                .collect();
            metrics.avg_response_ms = ms.iter().sum::<f64>() / ms.len() as f64;
            metrics.min_response_ms = ms.iter().cloned().fold(f64::INFINITY, f64::min);
            metrics.max_response_ms = ms.iter().cloned().fold(0.0, f64::max);
        }
        if stats.total_submitted > 0 {
            metrics.success_rate = stats.completed.len() as f64 / stats.total_submitted as f64;
        }

        metrics
    }
}

/// Ordering key: priority rank, boosted when remaining slack falls below the
/// minimum schedulable interval so urgent tasks jump ahead of calmer ones.
fn ordering_key(task: &Task, now: Instant, cfg: &SchedulerConfig) -> i64 {
    let mut key = task.priority.rank();
    if task.slack(now) < cfg.real_time_constraint() {
        key -= cfg.urgency_boost;
    }
    key
}

fn worker_loop(shared: Arc<Shared>) {
    while shared.running.load(Ordering::SeqCst) {
        let entry = shared.queue.lock().unwrap().pop();
        let Some(Reverse(entry)) = entry else {
            thread::sleep(shared.cfg.idle_poll());
            continue;
        };
        execute(&shared, entry);
    }
}

fn execute(shared: &Shared, entry: QueueEntry) {
    let mut task = entry.task;

    // Admission check: don't waste the unit on work that cannot finish in time.
    let now = Instant::now();
    if now + task.execution_time > task.deadline {
        warn!(task = %task.name, "task cannot meet deadline, failed at admission");
        task.status = TaskStatus::Failed;
        let mut stats = shared.stats.lock().unwrap();
        stats.missed_deadlines += 1;
        stats.failed.push(task);
        return;
    }

    task.status = TaskStatus::Running;
    shared.stats.lock().unwrap().executing = true;

    // The unit is occupied for exactly the task's execution time. A panic
    // here marks the task failed and leaves the loop running.
    let execution_time = task.execution_time;
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| thread::sleep(execution_time)));
    let finish = Instant::now();
    let response_time = finish.duration_since(entry.submitted_at);

    let mut stats = shared.stats.lock().unwrap();
    stats.executing = false;
    match outcome {
        Ok(()) if finish <= task.deadline => {
            debug!(task = %task.name, ?response_time, "task completed");
            task.status = TaskStatus::Completed;
            stats.response_times.push(response_time);
            stats.completed.push(task);
        }
        Ok(()) => {
            // Ran to completion but past the deadline; compliance is judged
            // against wall-clock finish, not the admission estimate.
            warn!(task = %task.name, ?response_time, "task missed deadline");
            task.status = TaskStatus::Failed;
            stats.response_times.push(response_time);
            stats.missed_deadlines += 1;
            stats.failed.push(task);
        }
        Err(_) => {
            warn!(task = %task.name, "task execution fault");
            task.status = TaskStatus::Failed;
            stats.failed.push(task);
        }
    }
}

impl Engine for RealTimeScheduler {
    fn start(&self) {
        RealTimeScheduler::start(self);
    }

    fn stop(&self) {
        RealTimeScheduler::stop(self);
    }

    fn submit(&self, task: Task, _hint: PlatformHint) -> bool {
        self.submit(task)
    }

    fn metrics(&self) -> PlatformMetrics {
        PlatformMetrics::scheduler_only(self.performance_metrics())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use platsim_model::{TaskPriority, TaskSpec};

    fn quick_task(name: &str, exec_ms: u64, deadline_ms: u64) -> Task {
        Task::from_spec(
            TaskSpec::new(name)
                .with_execution_time_ms(exec_ms)
                .with_deadline_ms(deadline_ms),
            Instant::now(),
        )
    }

    #[test]
    fn rejects_elapsed_deadline_without_counting() {
        let sched = RealTimeScheduler::new(SchedulerConfig::default());
        let task = quick_task("stale", 10, 0);
        thread::sleep(Duration::from_millis(5));

        assert!(!sched.submit(task));
        assert_eq!(sched.performance_metrics().total_submitted, 0);
    }

    #[test]
    fn accepts_deadline_that_has_not_yet_elapsed() {
        let sched = RealTimeScheduler::new(SchedulerConfig::default());
        // Only strictly past deadlines are rejected; a barely-future one is
        // admissible even if it can no longer be met.
        let task = quick_task("tight", 10, 5);
        assert!(sched.submit(task));
        assert_eq!(sched.performance_metrics().total_submitted, 1);
    }

    #[test]
    fn completes_task_with_ample_deadline() {
        let sched = RealTimeScheduler::new(SchedulerConfig::default());
        sched.start();

        assert!(sched.submit(quick_task("ok", 10, 1_000)));
        thread::sleep(Duration::from_millis(300));
        sched.stop();

        let m = sched.performance_metrics();
        assert_eq!(m.completed, 1);
        assert_eq!(m.failed, 0);
        assert_eq!(m.missed_deadlines, 0);
        assert_eq!(m.success_rate, 1.0);
        assert!(m.min_response_ms >= 10.0);
    }

    #[test]
    fn three_normal_tasks_all_complete() {
        let sched = RealTimeScheduler::new(SchedulerConfig::default());
        for i in 0..3 {
            assert!(sched.submit(quick_task(&format!("t{i}"), 10, 1_000)));
        }
        sched.start();
        thread::sleep(Duration::from_millis(500));
        sched.stop();

        let m = sched.performance_metrics();
        assert_eq!(m.completed, 3);
        assert_eq!(m.missed_deadlines, 0);
        assert_eq!(m.queued, 0);
    }

    #[test]
    fn unschedulable_task_fails_at_admission() {
        let sched = RealTimeScheduler::new(SchedulerConfig::default());
        // Accepted at submission (deadline still ahead) but impossible to run.
        assert!(sched.submit(quick_task("doomed", 100, 30)));

        sched.start();
        thread::sleep(Duration::from_millis(100));
        sched.stop();

        let m = sched.performance_metrics();
        assert_eq!(m.completed, 0);
        assert_eq!(m.failed, 1);
        assert_eq!(m.missed_deadlines, 1);
        // No response time is recorded for work that never ran.
        assert_eq!(m.avg_response_ms, 0.0);
    }

    #[test]
    fn late_finish_is_classified_as_missed_deadline() {
        // A finished-late outcome needs the sleep overshoot to exceed the
        // deadline margin, which cannot be forced without an injectable
        // clock: any margin wide enough to reliably pass admission is also
        // wide enough to usually absorb the overshoot. Probe with a margin
        // far below timer granularity; attempts screened out at admission or
        // completed in time still have to keep the books consistent.
        let sched = RealTimeScheduler::new(SchedulerConfig::default());

        for seq in 0..50u64 {
            let now = Instant::now();
            let mut task = Task::from_spec(TaskSpec::new("tight").with_execution_time_ms(1), now);
            task.deadline = now + Duration::from_millis(1) + Duration::from_micros(20);

            execute(
                &sched.inner,
                QueueEntry {
                    key: 0,
                    seq,
                    submitted_at: now,
                    task,
                },
            );

            let stats = sched.inner.stats.lock().unwrap();
            // Only runs that actually executed record a response time, so a
            // surplus over the completed count is a late finish.
            if stats.response_times.len() > stats.completed.len() {
                assert_eq!(stats.failed.len(), stats.missed_deadlines as usize);
                let last = stats.response_times[stats.response_times.len() - 1];
                assert!(last >= Duration::from_millis(1));
                return;
            }
        }

        let stats = sched.inner.stats.lock().unwrap();
        assert_eq!(stats.completed.len() + stats.failed.len(), 50);
        assert_eq!(stats.failed.len(), stats.missed_deadlines as usize);
    }

    #[test]
    fn higher_priority_runs_first() {
        let sched = RealTimeScheduler::new(SchedulerConfig::default());
        let low = Task::from_spec(
            TaskSpec::new("low")
                .with_priority(TaskPriority::Low)
                .with_execution_time_ms(10)
                .with_deadline_ms(2_000),
            Instant::now(),
        );
        let critical = Task::from_spec(
            TaskSpec::new("critical")
                .with_priority(TaskPriority::Critical)
                .with_execution_time_ms(10)
                .with_deadline_ms(2_000),
            Instant::now(),
        );

        // Queue both before the worker exists, low first.
        assert!(sched.submit(low));
        assert!(sched.submit(critical));
        sched.start();
        thread::sleep(Duration::from_millis(300));
        sched.stop();

        let stats = sched.inner.stats.lock().unwrap();
        assert_eq!(stats.completed.len(), 2);
        assert_eq!(stats.completed[0].name, "critical");
        assert_eq!(stats.completed[1].name, "low");
    }

    #[test]
    fn equal_priority_ties_break_fifo() {
        let sched = RealTimeScheduler::new(SchedulerConfig::default());
        for name in ["first", "second", "third"] {
            assert!(sched.submit(quick_task(name, 5, 2_000)));
        }
        sched.start();
        thread::sleep(Duration::from_millis(300));
        sched.stop();

        let stats = sched.inner.stats.lock().unwrap();
        let names: Vec<&str> = stats.completed.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn urgency_boost_outranks_higher_tier() {
        let cfg = SchedulerConfig::default();
        let now = Instant::now();

        let calm_critical = Task::from_spec(
            TaskSpec::new("calm")
                .with_priority(TaskPriority::Critical)
                .with_deadline_ms(1_000),
            now,
        );
        let urgent_normal = Task::from_spec(
            TaskSpec::new("urgent")
                .with_priority(TaskPriority::Normal)
                .with_execution_time_ms(1)
                .with_deadline_ms(5),
            now,
        );

        // Slack below the real-time constraint drops the key past Critical.
        assert!(ordering_key(&urgent_normal, now, &cfg) < ordering_key(&calm_critical, now, &cfg));
    }

    #[test]
    fn start_is_idempotent() {
        let sched = RealTimeScheduler::new(SchedulerConfig::default());
        sched.start();
        sched.start();

        // With a single worker, two 50ms tasks cannot both finish within 60ms.
        assert!(sched.submit(quick_task("a", 50, 5_000)));
        assert!(sched.submit(quick_task("b", 50, 5_000)));
        thread::sleep(Duration::from_millis(60));
        let m = sched.performance_metrics();
        assert!(m.completed <= 1, "tasks must execute one at a time");

        sched.stop();
    }

    #[test]
    fn stop_is_idempotent_and_safe_before_start() {
        let sched = RealTimeScheduler::new(SchedulerConfig::default());
        sched.stop();

        sched.start();
        sched.stop();
        sched.stop();
    }

    #[test]
    fn concurrent_submissions_are_all_accepted() {
        let sched = RealTimeScheduler::new(SchedulerConfig::default());

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let sched = sched.clone();
                thread::spawn(move || {
                    for i in 0..10 {
                        assert!(sched.submit(quick_task(&format!("w{worker}-{i}"), 1, 10_000)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let m = sched.performance_metrics();
        assert_eq!(m.total_submitted, 40);
        assert_eq!(m.queued, 40);
    }

    #[test]
    fn metrics_zeroed_without_work() {
        let sched = RealTimeScheduler::new(SchedulerConfig::default());
        let m = sched.performance_metrics();
        assert_eq!(m, SchedulerMetrics::default());
    }
}

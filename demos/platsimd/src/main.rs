//! Demo daemon: hybrid simulator + HTTP control surface.
//!
//! Starts the simulator in hybrid mode, runs a short synthetic workload,
//! prints the combined metrics report, then serves the HTTP API until
//! Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use platsim_api::{HttpApi, SimulatorAdapter};
use platsim_core::{PlatformConfig, PlatformSimulator};
use platsim_model::{PlatformHint, TaskPriority, TaskSpec};
use platsim_observe::{LogConfig, log_init};

const LISTEN_ADDR: &str = "127.0.0.1:4360";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    log_init(&LogConfig::default()).context("logger init")?;

    let mut cfg = PlatformConfig::default();
    // Short launches keep the demo snappy.
    cfg.lifecycle.launch_delay_ms = 50;
    let simulator = Arc::new(PlatformSimulator::new(cfg).context("simulator init")?);

    simulator.start();
    run_workload(&simulator).await;

    let metrics = simulator.performance_metrics();
    println!("{}", serde_json::to_string_pretty(&metrics)?);

    let handler = Arc::new(SimulatorAdapter::new(Arc::clone(&simulator)));
    let router = HttpApi::new(handler).router();
    let listener = tokio::net::TcpListener::bind(LISTEN_ADDR)
        .await
        .with_context(|| format!("bind {LISTEN_ADDR}"))?;
    info!(addr = LISTEN_ADDR, "http api listening");

    platsim_api::axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server")?;

    let simulator = Arc::clone(&simulator);
    tokio::task::spawn_blocking(move || simulator.stop())
        .await
        .context("simulator stop")?;
    info!("platsimd stopped");
    Ok(())
}

/// A small mixed workload: two real-time tiers, three app-tier tasks.
async fn run_workload(simulator: &Arc<PlatformSimulator>) {
    let specs = [
        TaskSpec::new("brake-monitor")
            .with_priority(TaskPriority::Critical)
            .with_execution_time_ms(10)
            .with_deadline_ms(1_000),
        TaskSpec::new("lane-assist")
            .with_priority(TaskPriority::High)
            .with_execution_time_ms(20)
            .with_deadline_ms(1_000),
        TaskSpec::new("navigation").with_priority(TaskPriority::Normal),
        TaskSpec::new("media-player").with_priority(TaskPriority::Low),
        TaskSpec::new("weather-sync").with_priority(TaskPriority::Background),
    ];

    let sim = Arc::clone(simulator);
    tokio::task::spawn_blocking(move || {
        for spec in specs {
            let name = spec.name.clone();
            let task = sim.create_task(spec);
            let accepted = sim.submit(task, PlatformHint::Auto);
            info!(task = %name, accepted, "workload submission");
        }
    })
    .await
    .ok();

    // Let the scheduler drain its queue.
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}

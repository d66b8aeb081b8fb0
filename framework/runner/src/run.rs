use crate::context::RunnerContext;
use crate::definition::{ScenarioDefinition, ScenarioDefinitionBuilder};
use crate::monitor::start_monitor;
use crate::progress::start_progress;
use crate::scheduler::run_scenario;
use crate::shutdown::start_shutdown_listener;
use anyhow::Context;
use seq_load_core::prelude::Transport;
use seq_load_instruments::{print_summary, InMemoryReporter, RunSummary};
use seq_load_summary_model::{append_run_record, LatencyStats, RunRecord, RunStats};
use std::time::Duration;

/// Run a scenario against `transport` and print its summary.
///
/// Configuration errors are returned before any VU starts. Everything that goes wrong once the
/// run is underway is recorded in the returned summary instead, so callers should inspect the
/// failed check count rather than relying on an error to detect a degraded backend.
pub fn run<T: Transport>(
    definition: ScenarioDefinitionBuilder,
    transport: T,
) -> anyhow::Result<RunSummary> {
    let definition = definition.build()?;
    let config = &definition.config;

    log::info!(
        "Running scenario: {} with {} VUs for {}",
        config.name(),
        config.concurrency(),
        config.termination()
    );

    let runner_context = RunnerContext::new()?;
    start_shutdown_listener(
        runner_context.executor(),
        runner_context.shutdown_handle().clone(),
    );

    if let Some(duration) = config.termination().planned_duration() {
        if !definition.cli.no_progress {
            // If the scenario is time bounded then start the progress monitor to show the user how long is left
            start_progress(duration, runner_context.shutdown_handle().new_listener());
        }
    }

    // Report high usage by the load generator itself, which would inflate measured latencies.
    start_monitor(runner_context.shutdown_handle().new_listener());

    let started_at = chrono::Utc::now().timestamp();
    let reporter = InMemoryReporter::new(config.concurrency());
    let summary = run_scenario(config, &transport, &reporter, &runner_context);

    // Stop the progress and monitor threads.
    runner_context.force_stop_scenario();
    let summary = summary?;

    print_summary(config.name(), &summary);
    log::info!(
        "Scenario {} finished: {} iterations, {}/{} checks passed ({:.2}%), {} transport failures",
        config.name(),
        summary.total_iterations,
        summary.total_checks_passed,
        summary.check_counts().total(),
        summary.check_counts().pass_rate() * 100.0,
        summary.transport_failures
    );

    if let Some(path) = &definition.cli.summary_file {
        let record = run_record(&definition, started_at, &summary);
        log::debug!("Run fingerprint: {}", record.fingerprint());
        append_run_record(record, path.clone())
            .with_context(|| format!("Failed to write run summary to {}", path.display()))?;
    }

    Ok(summary)
}

fn run_record(definition: &ScenarioDefinition, started_at: i64, summary: &RunSummary) -> RunRecord {
    let config = &definition.config;
    let termination = config.termination();

    let mut record = RunRecord::new(
        definition
            .cli
            .run_id
            .clone()
            .unwrap_or_else(|| nanoid::nanoid!()),
        config.name().to_string(),
        started_at,
        config.concurrency(),
        termination.iterations_per_vu(),
        termination.planned_duration().map(|d| d.as_secs_f64()),
        config.delay().as_secs_f64(),
        env!("CARGO_PKG_VERSION").to_string(),
    );
    for (key, value) in &definition.env {
        record.add_env(key.clone(), value.clone());
    }

    let latency = summary.latency.summary();
    record.set_stats(RunStats {
        total_iterations: summary.total_iterations,
        checks_passed: summary.total_checks_passed,
        checks_failed: summary.total_checks_failed,
        transport_failures: summary.transport_failures,
        wall_clock_s: summary.wall_clock.as_secs_f64(),
        latency: LatencyStats {
            min_ms: millis(latency.min),
            mean_ms: millis(latency.mean),
            p50_ms: millis(latency.p50),
            p90_ms: millis(latency.p90),
            p95_ms: millis(latency.p95),
            p99_ms: millis(latency.p99),
            max_ms: millis(latency.max),
        },
    });

    record
}

fn millis(d: Duration) -> f64 {
    d.as_micros() as f64 / 1000.0
}

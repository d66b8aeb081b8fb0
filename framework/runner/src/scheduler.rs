use crate::context::{RunnerContext, VuContext};
use crate::executor::Executor;
use crate::scenario::ScenarioConfig;
use anyhow::Context;
use seq_load_core::prelude::{DelegatedShutdownListener, Transport};
use seq_load_instruments::{RequestOutcome, ResultSink, RunSummary};
use std::time::{Instant, SystemTime};

/// Run every VU of the scenario to completion and return the finalized summary.
///
/// One OS thread is started per VU. Each VU checks the termination policy before each iteration,
/// so a request in flight when a duration expires is allowed to finish and the run may overrun by
/// up to one request plus one delay. Transport failures are recorded as failed outcomes and never
/// stop a VU.
///
/// The sink is finalized once all VU threads have been joined. The returned summary carries the
/// wall-clock time from the first VU starting to the last VU exiting. A VU that panics leaves the
/// run short of its planned iterations, so the run fails rather than returning that summary.
pub fn run_scenario<T: Transport>(
    scenario: &ScenarioConfig,
    transport: &T,
    sink: &dyn ResultSink,
    runner_context: &RunnerContext,
) -> anyhow::Result<RunSummary> {
    // Shared by all VUs, never written after this point.
    let started_at = Instant::now();

    let (spawn_error, panicked) = std::thread::scope(|scope| {
        let mut handles = Vec::with_capacity(scenario.concurrency());
        let mut spawn_error = None;

        for vu_index in 0..scenario.concurrency() {
            // Created before the thread so that a stop requested while VUs are starting is seen.
            let shutdown_listener = runner_context.shutdown_handle().new_listener();
            let executor = runner_context.executor();

            let spawned = std::thread::Builder::new()
                .name(format!("vu-{vu_index}"))
                .spawn_scoped(scope, move || {
                    run_vu(
                        VuContext::new(vu_index),
                        scenario,
                        transport,
                        sink,
                        executor,
                        started_at,
                        shutdown_listener,
                    )
                });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    // Stop the VUs that did start rather than reporting a partial load shape.
                    runner_context.force_stop_scenario();
                    spawn_error = Some(e);
                    break;
                }
            }
        }

        let mut panicked = 0usize;
        for handle in handles {
            if let Err(e) = handle.join() {
                log::error!("VU thread panicked: {e:?}");
                panicked += 1;
            }
        }

        (spawn_error, panicked)
    });

    let wall_clock = started_at.elapsed();
    let mut summary = sink.finalize();
    summary.wall_clock = wall_clock;

    if let Some(e) = spawn_error {
        return Err(e).context("Failed to spawn thread for VU");
    }
    if panicked > 0 {
        anyhow::bail!(
            "{panicked} of {} VUs panicked, the run completed {} iterations",
            scenario.concurrency(),
            summary.total_iterations
        );
    }

    Ok(summary)
}

fn run_vu<T: Transport>(
    mut vu: VuContext,
    scenario: &ScenarioConfig,
    transport: &T,
    sink: &dyn ResultSink,
    executor: &Executor,
    started_at: Instant,
    mut shutdown_listener: DelegatedShutdownListener,
) {
    log::debug!("Starting VU {}", vu.vu_index());

    loop {
        if shutdown_listener.should_shutdown() {
            log::debug!(
                "Stopping VU {} on shutdown after {} iterations",
                vu.vu_index(),
                vu.iteration_index()
            );
            break;
        }

        if scenario
            .termination()
            .is_complete(vu.iteration_index(), started_at.elapsed())
        {
            log::debug!(
                "Stopping VU {} after {} iterations",
                vu.vu_index(),
                vu.iteration_index()
            );
            break;
        }

        let request = scenario.build_request(&vu);

        let timestamp = SystemTime::now();
        let dispatched_at = Instant::now();
        let response = executor.execute_in_place(transport.send(&request));
        let latency = dispatched_at.elapsed();

        if let Err(e) = &response {
            log::warn!(
                "VU {} iteration {} failed: {e}",
                vu.vu_index(),
                vu.iteration_index()
            );
        }

        let check_results = scenario.evaluate(&response);
        let (status_code, error) = match &response {
            Ok(response) => (Some(response.status_code), None),
            Err(e) => (None, Some(e.to_string())),
        };

        sink.record(RequestOutcome {
            vu_index: vu.vu_index(),
            iteration_index: vu.iteration_index(),
            status_code,
            latency,
            check_results,
            timestamp,
            error,
        });

        vu.advance();

        if !scenario.delay().is_zero() {
            std::thread::sleep(scenario.delay());
        }
    }
}

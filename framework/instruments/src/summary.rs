use crate::latency::LatencyDistribution;
use crate::outcome::RequestOutcome;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckCounts {
    pub passed: u64,
    pub failed: u64,
}

impl CheckCounts {
    pub fn total(&self) -> u64 {
        self.passed + self.failed
    }

    /// Fraction of checks that passed, `0.0` when nothing was checked.
    pub fn pass_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.passed as f64 / total as f64,
        }
    }
}

/// Aggregate of every [RequestOutcome] recorded during a run.
///
/// A summary is also used as the per-shard accumulator inside a sink. Shards are combined with
/// [RunSummary::merge], which is order independent.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub total_iterations: u64,
    pub total_checks_passed: u64,
    pub total_checks_failed: u64,
    /// Iterations where the transport returned an error instead of a response.
    pub transport_failures: u64,
    pub status_codes: BTreeMap<u16, u64>,
    pub checks: BTreeMap<String, CheckCounts>,
    pub iterations_per_vu: BTreeMap<usize, u64>,
    pub latency: LatencyDistribution,
    /// Set by the runner once all VUs have exited.
    pub wall_clock: Duration,
}

impl RunSummary {
    pub fn fold(&mut self, outcome: &RequestOutcome) {
        self.total_iterations += 1;
        *self.iterations_per_vu.entry(outcome.vu_index).or_default() += 1;

        match outcome.status_code {
            Some(status_code) => *self.status_codes.entry(status_code).or_default() += 1,
            None => self.transport_failures += 1,
        }

        for (name, passed) in &outcome.check_results {
            let counts = self.checks.entry(name.clone()).or_default();
            if *passed {
                counts.passed += 1;
                self.total_checks_passed += 1;
            } else {
                counts.failed += 1;
                self.total_checks_failed += 1;
            }
        }

        self.latency.record(outcome.latency);
    }

    pub fn merge(&mut self, other: &RunSummary) {
        self.total_iterations += other.total_iterations;
        self.total_checks_passed += other.total_checks_passed;
        self.total_checks_failed += other.total_checks_failed;
        self.transport_failures += other.transport_failures;

        for (status_code, count) in &other.status_codes {
            *self.status_codes.entry(*status_code).or_default() += count;
        }
        for (name, counts) in &other.checks {
            let merged = self.checks.entry(name.clone()).or_default();
            merged.passed += counts.passed;
            merged.failed += counts.failed;
        }
        for (vu_index, count) in &other.iterations_per_vu {
            *self.iterations_per_vu.entry(*vu_index).or_default() += count;
        }

        self.latency.merge(&other.latency);
        self.wall_clock = self.wall_clock.max(other.wall_clock);
    }

    pub fn check_counts(&self) -> CheckCounts {
        CheckCounts {
            passed: self.total_checks_passed,
            failed: self.total_checks_failed,
        }
    }

    /// Completed iterations per second of wall-clock time.
    pub fn iterations_per_second(&self) -> f64 {
        let secs = self.wall_clock.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.total_iterations as f64 / secs
    }
}

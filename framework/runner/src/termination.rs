use std::time::Duration;

/// When a VU stops issuing requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum TerminationPolicy {
    /// Every VU runs exactly `count` iterations.
    #[display("{count} iterations per VU")]
    FixedIterations { count: u64 },
    /// VUs keep starting iterations until `duration` has passed since the run started.
    #[display("{}s", duration.as_secs_f64())]
    FixedDuration { duration: Duration },
}

impl TerminationPolicy {
    /// Whether a VU that has completed `iterations_done` iterations, `elapsed` after the run
    /// started, should stop before starting another.
    pub fn is_complete(&self, iterations_done: u64, elapsed: Duration) -> bool {
        match self {
            TerminationPolicy::FixedIterations { count } => iterations_done >= *count,
            TerminationPolicy::FixedDuration { duration } => elapsed >= *duration,
        }
    }

    pub fn planned_duration(&self) -> Option<Duration> {
        match self {
            TerminationPolicy::FixedIterations { .. } => None,
            TerminationPolicy::FixedDuration { duration } => Some(*duration),
        }
    }

    pub fn iterations_per_vu(&self) -> Option<u64> {
        match self {
            TerminationPolicy::FixedIterations { count } => Some(*count),
            TerminationPolicy::FixedDuration { .. } => None,
        }
    }
}

mod latency;
mod outcome;
mod report;
mod summary;

pub use latency::{LatencyDistribution, LatencySummary};
pub use outcome::RequestOutcome;
pub use report::{print_summary, InMemoryReporter, ResultSink};
pub use summary::{CheckCounts, RunSummary};

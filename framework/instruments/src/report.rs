mod in_memory_reporter;
mod summary_table;

use crate::outcome::RequestOutcome;
use crate::summary::RunSummary;

pub use in_memory_reporter::InMemoryReporter;
pub use summary_table::print_summary;

/// Receives outcomes from every VU of a run.
///
/// [ResultSink::record] is called concurrently from all VU threads. [ResultSink::finalize] is
/// called once, after every VU has exited.
pub trait ResultSink: Send + Sync {
    fn record(&self, outcome: RequestOutcome);

    fn finalize(&self) -> RunSummary;
}

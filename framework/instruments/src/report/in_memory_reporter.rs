use crate::outcome::RequestOutcome;
use crate::report::ResultSink;
use crate::summary::RunSummary;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Keeps one accumulator per VU and merges them when the run is finalized.
///
/// Outcomes are routed to a shard by `vu_index`, so VUs never contend with each other. Any number
/// of shards is safe for any caller, a shard count matching the VU count just avoids sharing.
pub struct InMemoryReporter {
    shards: Vec<Mutex<RunSummary>>,
    finalized: AtomicBool,
}

impl InMemoryReporter {
    pub fn new(shard_count: usize) -> Self {
        Self {
            shards: (0..shard_count.max(1))
                .map(|_| Mutex::new(RunSummary::default()))
                .collect(),
            finalized: AtomicBool::new(false),
        }
    }
}

impl ResultSink for InMemoryReporter {
    fn record(&self, outcome: RequestOutcome) {
        log::trace!(
            "VU {} iteration {}: status {:?} in {:?}",
            outcome.vu_index,
            outcome.iteration_index,
            outcome.status_code,
            outcome.latency
        );

        let mut shard = self.shards[outcome.vu_index % self.shards.len()].lock();
        // Checked under the shard lock. `finalize` sets the flag before reading any shard, so an
        // outcome either lands in the snapshot or is dropped.
        if self.finalized.load(Ordering::Acquire) {
            drop(shard);
            log::warn!(
                "Dropping outcome for VU {} iteration {} recorded after the run was finalized",
                outcome.vu_index,
                outcome.iteration_index
            );
            return;
        }
        shard.fold(&outcome);
    }

    fn finalize(&self) -> RunSummary {
        self.finalized.store(true, Ordering::Release);

        self.shards
            .iter()
            .fold(RunSummary::default(), |mut acc, shard| {
                acc.merge(&shard.lock());
                acc
            })
    }
}

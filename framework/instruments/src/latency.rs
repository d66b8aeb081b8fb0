use hdrhistogram::Histogram;
use std::time::Duration;

/// Highest latency the histogram tracks exactly, one hour in microseconds. Longer samples are
/// clamped to this value.
const MAX_TRACKED_MICROS: u64 = 3_600_000_000;

/// Latency samples in microseconds, held in an HDR histogram so that shards can be merged without
/// keeping every sample.
#[derive(Debug, Clone)]
pub struct LatencyDistribution {
    histogram: Histogram<u64>,
}

impl Default for LatencyDistribution {
    fn default() -> Self {
        Self {
            histogram: Histogram::new_with_bounds(1, MAX_TRACKED_MICROS, 3)
                .expect("Histogram bounds are valid"),
        }
    }
}

impl LatencyDistribution {
    pub fn record(&mut self, latency: Duration) {
        let micros = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX);
        self.histogram.saturating_record(micros);
    }

    pub fn merge(&mut self, other: &LatencyDistribution) {
        if let Err(e) = self.histogram.add(&other.histogram) {
            log::warn!("Failed to merge latency samples: {e:?}");
        }
    }

    pub fn count(&self) -> u64 {
        self.histogram.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histogram.is_empty()
    }

    pub fn min(&self) -> Duration {
        if self.is_empty() {
            return Duration::ZERO;
        }
        Duration::from_micros(self.histogram.min())
    }

    pub fn max(&self) -> Duration {
        Duration::from_micros(self.histogram.max())
    }

    pub fn mean(&self) -> Duration {
        Duration::from_secs_f64(self.histogram.mean() / 1_000_000.0)
    }

    /// The latency at the given percentile, in the range `0.0..=100.0`.
    pub fn percentile(&self, percentile: f64) -> Duration {
        Duration::from_micros(self.histogram.value_at_percentile(percentile))
    }

    pub fn summary(&self) -> LatencySummary {
        LatencySummary {
            count: self.count(),
            min: self.min(),
            mean: self.mean(),
            p50: self.percentile(50.0),
            p90: self.percentile(90.0),
            p95: self.percentile(95.0),
            p99: self.percentile(99.0),
            max: self.max(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatencySummary {
    pub count: u64,
    pub min: Duration,
    pub mean: Duration,
    pub p50: Duration,
    pub p90: Duration,
    pub p95: Duration,
    pub p99: Duration,
    pub max: Duration,
}

use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};

/// The result of one VU iteration. Created once the transport call returns and handed straight to
/// a [crate::ResultSink].
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOutcome {
    pub vu_index: usize,
    pub iteration_index: u64,
    /// Absent when the transport failed to produce a response.
    pub status_code: Option<u16>,
    pub latency: Duration,
    pub check_results: BTreeMap<String, bool>,
    /// Wall-clock time at which the request was dispatched.
    pub timestamp: SystemTime,
    /// The transport error, if there was one.
    pub error: Option<String>,
}

impl RequestOutcome {
    pub fn is_transport_failure(&self) -> bool {
        self.status_code.is_none()
    }

    pub fn checks_passed(&self) -> u64 {
        self.check_results.values().filter(|passed| **passed).count() as u64
    }

    pub fn checks_failed(&self) -> u64 {
        self.check_results.values().filter(|passed| !**passed).count() as u64
    }
}

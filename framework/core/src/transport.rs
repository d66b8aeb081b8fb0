use crate::error::TransportError;
use bytes::Bytes;
use std::future::Future;
use std::time::Duration;

/// A fully rendered request, ready to be POSTed to the service under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioRequest {
    /// Path relative to the base URL, including any query string.
    pub path: String,
    pub body: Bytes,
    pub headers: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status_code: u16,
    pub body: Bytes,
    /// Latency as measured by the transport itself.
    pub latency: Duration,
}

/// Sends requests to the service under test.
///
/// Implementations must not retry. Each call to [Transport::send] is exactly one request as far
/// as the run summary is concerned.
pub trait Transport: Sync {
    fn send(
        &self,
        request: &ScenarioRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>>;
}

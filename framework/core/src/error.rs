/// A scenario that cannot be run. Raised before any VU starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
    #[error("no termination policy configured, set an iteration count or a duration")]
    MissingTerminationPolicy,
    #[error("both an iteration count and a duration were configured, only one may be set")]
    ConflictingTerminationPolicy,
    #[error("iteration count must be at least 1")]
    ZeroIterations,
    #[error("duration must be greater than zero")]
    ZeroDuration,
    #[error("inter-iteration delay must be a finite, non-negative number of seconds, got {0}")]
    InvalidDelay(f64),
    #[error("target path must not be empty")]
    EmptyTargetPath,
    #[error("no request body configured")]
    MissingRequestBody,
    #[error("page size and total pages must both be at least 1, got page size {page_size} and {total_pages} pages")]
    InvalidPagination { page_size: u64, total_pages: u64 },
    #[error("request body template has no field at `{0}`")]
    UnknownTemplateField(String),
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

/// A request that did not produce a response.
///
/// These never abort a run. The VU records a failed outcome and moves on to its next iteration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("failed to read response body: {0}")]
    Body(String),
}

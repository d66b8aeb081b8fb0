use seq_load_core::prelude::TransportError;

/// Map a `reqwest` error onto the transport failure kinds that end up in the run summary.
pub(crate) fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else if err.is_body() || err.is_decode() {
        TransportError::Body(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}

#![allow(dead_code)]

use bytes::Bytes;
use seq_load_runner::prelude::*;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub fn sample_cli_cfg() -> SeqLoadScenarioCli {
    SeqLoadScenarioCli {
        connection_string: "http://localhost:9200".to_string(),
        vus: None,
        iterations: None,
        duration: None,
        delay: None,
        request_timeout: None,
        no_progress: true,
        run_id: None,
        summary_file: None,
    }
}

pub fn aggregation_scenario(name: &str) -> ScenarioDefinitionBuilder {
    ScenarioDefinitionBuilder::new(name, sample_cli_cfg())
        .with_target_path("/logs/_search?request_cache=false")
        .with_body(BodyTemplate::fixed(
            json!({"size": 0, "aggs": {"name": {"terms": {"field": "status"}}}}),
        ))
}

pub fn paginated_scenario(name: &str, page_size: u64, total_pages: u64) -> ScenarioDefinitionBuilder {
    ScenarioDefinitionBuilder::new(name, sample_cli_cfg())
        .with_target_path("/complex-search")
        .with_body(
            BodyTemplate::fixed(json!({"order": "ORDER_ASC", "size": page_size, "offset": 0}))
                .with_parameter(
                    "/offset",
                    Parameter::PageOffset {
                        page_size,
                        total_pages,
                    },
                ),
        )
}

pub fn response(status_code: u16) -> TransportResponse {
    TransportResponse {
        status_code,
        body: Bytes::from_static(b"{}"),
        latency: Duration::from_millis(1),
    }
}

/// Always answers with the same status, optionally after a pause.
pub struct StatusTransport {
    pub status_code: u16,
    pub latency: Duration,
    pub calls: AtomicU64,
}

impl StatusTransport {
    pub fn new(status_code: u16) -> Self {
        Self::with_latency(status_code, Duration::ZERO)
    }

    pub fn with_latency(status_code: u16, latency: Duration) -> Self {
        Self {
            status_code,
            latency,
            calls: AtomicU64::new(0),
        }
    }
}

impl Transport for StatusTransport {
    async fn send(&self, _request: &ScenarioRequest) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(response(self.status_code))
    }
}

/// Fails the listed calls, counted from zero across all VUs, and answers 200 otherwise.
pub struct FlakyTransport {
    pub fail_calls: Vec<u64>,
    pub calls: AtomicU64,
}

impl Transport for FlakyTransport {
    async fn send(&self, _request: &ScenarioRequest) -> Result<TransportResponse, TransportError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_calls.contains(&call) {
            return Err(TransportError::Connect("connection refused".to_string()));
        }
        Ok(response(200))
    }
}

/// Panics on the listed calls, counted from zero across all VUs, and answers 200 otherwise.
pub struct PanickingTransport {
    pub panic_calls: Vec<u64>,
    pub calls: AtomicU64,
}

impl Transport for PanickingTransport {
    async fn send(&self, _request: &ScenarioRequest) -> Result<TransportResponse, TransportError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_calls.contains(&call) {
            panic!("transport bug on call {call}");
        }
        Ok(response(200))
    }
}

#[derive(Debug, Clone)]
pub struct SentRequest {
    pub vu_thread: String,
    pub dispatched_at: Instant,
    pub body: Bytes,
}

/// Remembers every request it was sent, and which VU thread sent it.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<SentRequest>>,
    pub latency: Duration,
}

impl Transport for RecordingTransport {
    async fn send(&self, request: &ScenarioRequest) -> Result<TransportResponse, TransportError> {
        let sent = SentRequest {
            vu_thread: std::thread::current()
                .name()
                .unwrap_or_default()
                .to_string(),
            dispatched_at: Instant::now(),
            body: request.body.clone(),
        };
        self.sent.lock().unwrap().push(sent);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(response(200))
    }
}

/// Keeps every outcome as well as summarising them.
pub struct CapturingSink {
    pub reporter: InMemoryReporter,
    pub outcomes: Mutex<Vec<RequestOutcome>>,
}

impl CapturingSink {
    pub fn new(vus: usize) -> Self {
        Self {
            reporter: InMemoryReporter::new(vus),
            outcomes: Mutex::new(Vec::new()),
        }
    }
}

impl ResultSink for CapturingSink {
    fn record(&self, outcome: RequestOutcome) {
        self.outcomes.lock().unwrap().push(outcome.clone());
        self.reporter.record(outcome);
    }

    fn finalize(&self) -> RunSummary {
        self.reporter.finalize()
    }
}

pub fn execute<T: Transport>(
    builder: ScenarioDefinitionBuilder,
    transport: &T,
    sink: &dyn ResultSink,
) -> RunSummary {
    let definition = builder.build().unwrap();
    let runner_context = RunnerContext::new().unwrap();
    run_scenario(&definition.config, transport, sink, &runner_context).unwrap()
}

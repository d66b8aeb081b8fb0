use crate::error::classify;
use anyhow::Context;
use seq_load_core::prelude::{ScenarioRequest, Transport, TransportError, TransportResponse};
use std::time::{Duration, Instant};
use url::Url;

/// POSTs scenario requests to a base URL over HTTP. Never retries.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Requests are abandoned after `timeout` when one is given.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid base URL: {base_url}"))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        log::debug!("HTTP transport targeting {base_url}");

        Ok(Self { client, base_url })
    }

    /// `path` is appended to the base URL as-is, so a base URL with a path prefix keeps it.
    pub fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        let endpoint = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&endpoint).map_err(|e| TransportError::Request(format!("{endpoint}: {e}")))
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &ScenarioRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .client
            .post(self.endpoint(&request.path)?)
            .body(request.body.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let started = Instant::now();
        let response = builder.send().await.map_err(classify)?;
        let status_code = response.status().as_u16();
        let body = response.bytes().await.map_err(classify)?;

        Ok(TransportResponse {
            status_code,
            body,
            latency: started.elapsed(),
        })
    }
}

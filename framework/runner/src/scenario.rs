use crate::check::Check;
use crate::context::VuContext;
use crate::template::PreparedBody;
use crate::termination::TerminationPolicy;
use seq_load_core::prelude::{ScenarioRequest, TransportError, TransportResponse};
use std::collections::BTreeMap;
use std::time::Duration;

/// An immutable, validated description of one load pattern.
///
/// Built with [crate::prelude::ScenarioDefinitionBuilder], which guarantees at least one VU, a
/// non-empty termination policy and a renderable body.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    pub(crate) name: String,
    pub(crate) target_path: String,
    pub(crate) body: PreparedBody,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) concurrency: usize,
    pub(crate) termination: TerminationPolicy,
    pub(crate) delay: Duration,
    pub(crate) checks: Vec<Check>,
}

impl ScenarioConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target_path(&self) -> &str {
        &self.target_path
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn termination(&self) -> TerminationPolicy {
        self.termination
    }

    /// Pause between the end of one iteration and the start of the next, per VU.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// The request for the VU's current iteration. Depends only on the VU's iteration index.
    pub fn build_request(&self, vu: &VuContext) -> ScenarioRequest {
        ScenarioRequest {
            path: self.target_path.clone(),
            body: self.body.for_iteration(vu),
            headers: self.headers.clone(),
        }
    }

    /// Result of every check against a response. Never fails, see [Check::evaluate].
    pub fn evaluate(
        &self,
        response: &Result<TransportResponse, TransportError>,
    ) -> BTreeMap<String, bool> {
        self.checks
            .iter()
            .map(|check| (check.name().to_string(), check.evaluate(response)))
            .collect()
    }
}

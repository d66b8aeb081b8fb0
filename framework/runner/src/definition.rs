use crate::check::Check;
use crate::cli::SeqLoadScenarioCli;
use crate::init::init;
use crate::scenario::ScenarioConfig;
use crate::template::{BodyTemplate, PreparedBody};
use crate::termination::TerminationPolicy;
use seq_load_core::prelude::ConfigurationError;
use std::collections::BTreeMap;
use std::time::Duration;

/// Pause between iterations when neither the scenario nor the CLI sets one.
pub const DEFAULT_DELAY_S: f64 = 0.2;

/// The builder for a scenario definition.
///
/// This must be used at the start of a scenario binary to describe the load you want to generate.
/// Values set with the `with_default_*` functions can be overridden from the command line.
#[derive(Debug)]
pub struct ScenarioDefinitionBuilder {
    /// The name of the scenario, which should be unique within the test suite.
    ///
    /// Recommended value is `env!("CARGO_PKG_NAME")`.
    name: String,
    cli: SeqLoadScenarioCli,
    /// Path of the endpoint relative to the base URL, including any query string.
    target_path: Option<String>,
    body: Option<BodyTemplate>,
    headers: Vec<(String, String)>,
    default_vus: Option<usize>,
    default_iterations: Option<u64>,
    default_duration: Option<Duration>,
    default_delay_s: Option<f64>,
    checks: Vec<Check>,
    /// Scenario parameters recorded alongside the run summary.
    env: BTreeMap<String, String>,
}

/// A validated scenario together with the run options it was configured with.
#[derive(Debug)]
pub struct ScenarioDefinition {
    pub config: ScenarioConfig,
    pub cli: SeqLoadScenarioCli,
    pub env: BTreeMap<String, String>,
}

impl ScenarioDefinitionBuilder {
    /// Initialise a new scenario definition from the scenario name and command line arguments.
    pub fn new(name: &str, cli: SeqLoadScenarioCli) -> Self {
        Self {
            name: name.to_string(),
            cli,
            target_path: None,
            body: None,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            default_vus: None,
            default_iterations: None,
            default_duration: None,
            default_delay_s: None,
            checks: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    /// Parse the command line and set up logging, then create the builder.
    pub fn new_with_init(name: &str) -> Self {
        Self::new(name, init())
    }

    pub fn cli(&self) -> &SeqLoadScenarioCli {
        &self.cli
    }

    /// The base URL of the service under test.
    pub fn connection_string(&self) -> &str {
        &self.cli.connection_string
    }

    /// The per-request timeout requested on the command line, for configuring the transport.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.cli.request_timeout.map(Duration::from_secs)
    }

    pub fn with_target_path(mut self, target_path: &str) -> Self {
        self.target_path = Some(target_path.to_string());
        self
    }

    pub fn with_body(mut self, body: BodyTemplate) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a header to every request. `Content-Type: application/json` is set by default.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_default_vus(mut self, vus: usize) -> Self {
        self.default_vus = Some(vus);
        self
    }

    pub fn with_default_iterations(mut self, iterations: u64) -> Self {
        self.default_iterations = Some(iterations);
        self
    }

    pub fn with_default_duration_s(self, duration_s: u64) -> Self {
        self.with_default_duration(Duration::from_secs(duration_s))
    }

    pub fn with_default_duration(mut self, duration: Duration) -> Self {
        self.default_duration = Some(duration);
        self
    }

    pub fn with_default_delay_s(mut self, delay_s: f64) -> Self {
        self.default_delay_s = Some(delay_s);
        self
    }

    /// Add a check. Scenarios without checks are given [Check::ok].
    pub fn use_check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    /// Record a scenario parameter in the run history. Parameters feed the run fingerprint, so
    /// only add values that change the shape of the load.
    pub fn add_env(mut self, key: &str, value: impl ToString) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    fn termination(&self) -> Result<TerminationPolicy, ConfigurationError> {
        let (iterations, duration) = match (self.cli.iterations, self.cli.duration) {
            (None, None) => (self.default_iterations, self.default_duration),
            (iterations, duration) => (iterations, duration.map(Duration::from_secs)),
        };

        match (iterations, duration) {
            (Some(_), Some(_)) => Err(ConfigurationError::ConflictingTerminationPolicy),
            (None, None) => Err(ConfigurationError::MissingTerminationPolicy),
            (Some(0), None) => Err(ConfigurationError::ZeroIterations),
            (Some(count), None) => Ok(TerminationPolicy::FixedIterations { count }),
            (None, Some(duration)) if duration.is_zero() => Err(ConfigurationError::ZeroDuration),
            (None, Some(duration)) => Ok(TerminationPolicy::FixedDuration { duration }),
        }
    }

    fn delay(&self) -> Result<Duration, ConfigurationError> {
        let delay_s = self
            .cli
            .delay
            .or(self.default_delay_s)
            .unwrap_or(DEFAULT_DELAY_S);

        // Rejects negative, non-finite and out of range values.
        Duration::try_from_secs_f64(delay_s).map_err(|_| ConfigurationError::InvalidDelay(delay_s))
    }

    /// Validate the scenario and apply command line overrides.
    pub fn build(self) -> Result<ScenarioDefinition, ConfigurationError> {
        let concurrency = self.cli.vus.or(self.default_vus).unwrap_or(1);
        if concurrency < 1 {
            return Err(ConfigurationError::ZeroConcurrency);
        }

        let termination = self.termination()?;
        let delay = self.delay()?;

        let target_path = match self.target_path {
            Some(path) if !path.trim().is_empty() => path,
            _ => return Err(ConfigurationError::EmptyTargetPath),
        };
        let body = PreparedBody::prepare(self.body.ok_or(ConfigurationError::MissingRequestBody)?)?;

        let checks = if self.checks.is_empty() {
            vec![Check::ok()]
        } else {
            self.checks
        };

        Ok(ScenarioDefinition {
            config: ScenarioConfig {
                name: self.name,
                target_path,
                body,
                headers: self.headers,
                concurrency,
                termination,
                delay,
                checks,
            },
            cli: self.cli,
            env: self.env,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::VuContext;
    use crate::template::Parameter;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn cli() -> SeqLoadScenarioCli {
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

    fn builder(cli: SeqLoadScenarioCli) -> ScenarioDefinitionBuilder {
        ScenarioDefinitionBuilder::new("test", cli)
            .with_target_path("/logs/_search")
            .with_body(BodyTemplate::fixed(json!({"size": 0})))
    }

    #[test]
    fn defaults() {
        let definition = builder(cli()).with_default_iterations(5).build().unwrap();
        let config = definition.config;

        assert_eq!(1, config.concurrency());
        assert_eq!(
            TerminationPolicy::FixedIterations { count: 5 },
            config.termination()
        );
        assert_eq!(Duration::from_millis(200), config.delay());
        assert_eq!(1, config.checks().len());
        assert_eq!("200-ok", config.checks()[0].name());
    }

    #[test]
    fn cli_overrides_defaults() {
        let mut cli = cli();
        cli.vus = Some(8);
        cli.duration = Some(30);
        cli.delay = Some(0.0);

        let config = builder(cli)
            .with_default_vus(2)
            .with_default_iterations(5)
            .build()
            .unwrap()
            .config;

        assert_eq!(8, config.concurrency());
        assert_eq!(
            TerminationPolicy::FixedDuration {
                duration: Duration::from_secs(30)
            },
            config.termination()
        );
        assert_eq!(Duration::ZERO, config.delay());
    }

    #[test]
    fn zero_vus_is_fatal() {
        let err = builder(cli())
            .with_default_vus(0)
            .with_default_iterations(1)
            .build()
            .unwrap_err();

        assert_eq!(ConfigurationError::ZeroConcurrency, err);
    }

    #[test]
    fn termination_policy_is_required() {
        assert_eq!(
            ConfigurationError::MissingTerminationPolicy,
            builder(cli()).build().unwrap_err()
        );
    }

    #[test]
    fn only_one_termination_policy() {
        let err = builder(cli())
            .with_default_iterations(1)
            .with_default_duration_s(1)
            .build()
            .unwrap_err();

        assert_eq!(ConfigurationError::ConflictingTerminationPolicy, err);
    }

    #[test]
    fn zero_length_runs_are_fatal() {
        assert_eq!(
            ConfigurationError::ZeroIterations,
            builder(cli())
                .with_default_iterations(0)
                .build()
                .unwrap_err()
        );
        assert_eq!(
            ConfigurationError::ZeroDuration,
            builder(cli())
                .with_default_duration_s(0)
                .build()
                .unwrap_err()
        );
    }

    #[test]
    fn negative_delay_is_fatal() {
        let err = builder(cli())
            .with_default_iterations(1)
            .with_default_delay_s(-1.0)
            .build()
            .unwrap_err();

        assert_eq!(ConfigurationError::InvalidDelay(-1.0), err);
    }

    #[test]
    fn huge_delay_is_fatal() {
        let mut cli = cli();
        cli.delay = Some(1e300);

        let err = builder(cli)
            .with_default_iterations(1)
            .build()
            .unwrap_err();

        assert_eq!(ConfigurationError::InvalidDelay(1e300), err);
    }

    #[test]
    fn non_finite_delay_is_fatal() {
        let err = builder(cli())
            .with_default_iterations(1)
            .with_default_delay_s(f64::INFINITY)
            .build()
            .unwrap_err();

        assert_eq!(ConfigurationError::InvalidDelay(f64::INFINITY), err);
    }

    #[test]
    fn target_path_and_body_are_required() {
        let err = ScenarioDefinitionBuilder::new("test", cli())
            .with_body(BodyTemplate::fixed(json!({})))
            .with_default_iterations(1)
            .build()
            .unwrap_err();
        assert_eq!(ConfigurationError::EmptyTargetPath, err);

        let err = ScenarioDefinitionBuilder::new("test", cli())
            .with_target_path("/complex-search")
            .with_default_iterations(1)
            .build()
            .unwrap_err();
        assert_eq!(ConfigurationError::MissingRequestBody, err);
    }

    #[test]
    fn headers_replace_case_insensitively() {
        let config = builder(cli())
            .with_default_iterations(1)
            .with_header("content-type", "application/x-ndjson")
            .build()
            .unwrap()
            .config;

        let request = config.build_request(&VuContext::new(0));
        assert_eq!(
            vec![(
                "content-type".to_string(),
                "application/x-ndjson".to_string()
            )],
            request.headers
        );
    }

    #[test]
    fn paginated_request_uses_iteration_index() {
        let config = ScenarioDefinitionBuilder::new("test", cli())
            .with_target_path("/complex-search")
            .with_body(
                BodyTemplate::fixed(json!({"size": 10, "offset": 0})).with_parameter(
                    "/offset",
                    Parameter::PageOffset {
                        page_size: 10,
                        total_pages: 3,
                    },
                ),
            )
            .with_default_iterations(1)
            .build()
            .unwrap()
            .config;

        let offsets = (0..7)
            .map(|i| {
                let request = config.build_request(&VuContext::at_iteration(1, i));
                let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
                body["offset"].as_u64().unwrap()
            })
            .collect::<Vec<_>>();

        assert_eq!(vec![0, 10, 20, 0, 10, 20, 0], offsets);
    }
}

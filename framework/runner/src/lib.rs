mod check;
mod cli;
mod context;
mod definition;
mod executor;
mod init;
mod monitor;
mod progress;
mod run;
mod scenario;
mod scheduler;
mod shutdown;
mod template;
mod termination;
mod types;

pub mod prelude {
    pub use crate::check::{Check, CheckFn, CheckPredicate};
    pub use crate::cli::SeqLoadScenarioCli;
    pub use crate::context::{RunnerContext, VuContext};
    pub use crate::definition::{ScenarioDefinition, ScenarioDefinitionBuilder, DEFAULT_DELAY_S};
    pub use crate::executor::Executor;
    pub use crate::run::run;
    pub use crate::scenario::ScenarioConfig;
    pub use crate::scheduler::run_scenario;
    pub use crate::template::{page_offset, BodyTemplate, Parameter};
    pub use crate::termination::TerminationPolicy;
    pub use crate::types::LoadResult;

    pub use seq_load_core::prelude::{
        ConfigurationError, ScenarioRequest, Transport, TransportError, TransportResponse,
    };
    pub use seq_load_instruments::{
        InMemoryReporter, LatencySummary, RequestOutcome, ResultSink, RunSummary,
    };
}

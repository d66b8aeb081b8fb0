use crate::cli::SeqLoadScenarioCli;
use clap::Parser;

/// Initialise the CLI and logging for the runner.
pub fn init() -> SeqLoadScenarioCli {
    env_logger::init();

    SeqLoadScenarioCli::parse()
}

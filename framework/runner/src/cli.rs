use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(about, long_about = None)]
pub struct SeqLoadScenarioCli {
    /// Base URL of the service to test, for example `http://localhost:9200`
    #[clap(short, long, env = "BASE_URL")]
    pub connection_string: String,

    /// The number of virtual users to run, overriding the scenario default
    #[clap(long)]
    pub vus: Option<usize>,

    /// The number of iterations each virtual user runs before stopping.
    ///
    /// Replaces the scenario's default termination policy.
    #[clap(long, conflicts_with = "duration")]
    pub iterations: Option<u64>,

    /// The number of seconds to run the scenario for.
    ///
    /// Replaces the scenario's default termination policy.
    #[clap(long)]
    pub duration: Option<u64>,

    /// Seconds each virtual user pauses between iterations, fractions allowed
    #[clap(long)]
    pub delay: Option<f64>,

    /// Seconds before a single request is abandoned and recorded as a transport failure.
    ///
    /// Requests wait indefinitely when not set.
    #[clap(long)]
    pub request_timeout: Option<u64>,

    /// Do not show a progress bar on the CLI.
    ///
    /// This is recommended for CI/CD environments where the progress bar isn't being looked at by anyone and is just adding noise to the logs.
    #[clap(long, default_value = "false")]
    pub no_progress: bool,

    /// Set the ID of this run
    ///
    /// If not set, a random ID is used.
    #[arg(long, short)]
    pub run_id: Option<String>,

    /// Append a JSON record of this run to the given file
    #[arg(long)]
    pub summary_file: Option<PathBuf>,
}

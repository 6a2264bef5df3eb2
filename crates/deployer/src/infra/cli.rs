//! CLI arguments for the `deployer` binary.

use {
    clap::Parser,
    std::path::PathBuf,
    url::Url,
};

/// Deploy the Balloons token and its DEX.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// The log filter.
    #[clap(long, env, default_value = "warn,deployer=info,contracts=info")]
    pub log: String,

    /// At which log level logs should be printed to stderr instead of stdout.
    #[clap(long, env)]
    pub stderr_threshold: Option<tracing::Level>,

    /// Whether to use JSON format for the logs.
    #[clap(long, env, default_value = "false")]
    pub use_json_logs: bool,

    /// Path to the deployment configuration file. This file should be in TOML
    /// format. Without it a local development node is assumed.
    #[clap(long, env)]
    pub config: Option<PathBuf>,

    /// The node RPC API endpoint. Overrides the configuration file.
    #[clap(long, env)]
    pub node_url: Option<Url>,

    /// Name of the network deployments are recorded under. Overrides the
    /// configuration file.
    #[clap(long, env)]
    pub network: Option<String>,

    /// Only run scripts registered under one of these tags.
    #[clap(long, env, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Forget recorded deployments for the network before running.
    #[clap(long, env)]
    pub reset: bool,
}

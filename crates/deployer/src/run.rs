use {
    crate::{
        domain::script,
        infra::{Config, Framework, cli, config, observe},
    },
    anyhow::Result,
    clap::Parser,
};

/// Parses the arguments, sets up logging and runs the deployment. Exits the
/// process with a non-zero status on failure.
pub async fn start(args: impl Iterator<Item = String>) {
    let args = cli::Args::parse_from(args);
    ::observe::tracing::initialize(&::observe::Config::new(
        &args.log,
        args.stderr_threshold,
        args.use_json_logs,
    ));
    tracing::info!("running deployer with {args:#?}");

    if let Err(err) = run(args).await {
        tracing::error!(?err, "deployment failed");
        std::process::exit(1);
    }
}

pub async fn run(args: cli::Args) -> Result<()> {
    if !script::selected(&args.tags) {
        observe::skipped(&args.tags);
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => config::file::load(path).await?,
        None => Config::default(),
    };
    if let Some(node_url) = args.node_url {
        config = config.with_node_url(node_url);
    }
    if let Some(network) = args.network {
        config = config.with_network(network);
    }
    tracing::debug!(?config, "loaded configuration");

    let framework = Framework::new(&config)?;
    framework.prepare(args.reset).await?;
    script::run(&framework, &config.parameters).await
}

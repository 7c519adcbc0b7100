//! taskmate binary entry point.

use clap::Parser;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskmate::agent::AgentExecutor;
use taskmate::cli::Cli;
use taskmate::config::AgentConfig;
use taskmate::session::Session;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> taskmate::error::Result<()> {
    let mut config = AgentConfig::from_env()?;
    cli.apply_to(&mut config);
    config.validate()?;
    info!(model = %config.model, temperature = config.temperature, "starting session");

    let mut session = Session::new(AgentExecutor::from_config(&config))
        .with_history_limit(config.max_history_turns)
        .with_error_policy(config.on_turn_error);

    session
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use carelog_client::HttpClient;
use carelog_core::UserId;
use carelog_state::Coordinator;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use carelog_cli::commands::{children, feed, handoff, insights, log, sleep_end, voice};
use carelog_cli::{ChildrenAction, Cli, Commands, Config};

/// Load config and build a coordinator over the configured server.
fn connect(config_path: Option<&Path>) -> Result<(Coordinator, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let user_id = UserId::new(config.user_id.as_str()).context("invalid user_id in configuration")?;
    let client = HttpClient::new(&config.base_url, user_id, config.request_timeout())
        .context("failed to create HTTP client")?;
    Ok((Coordinator::new(Arc::new(client)), config))
}

async fn dispatch<W: Write>(
    writer: &mut W,
    command: &Commands,
    coordinator: &Coordinator,
    config: &Config,
) -> Result<()> {
    match command {
        Commands::Children { action, json } => match action {
            None => children::list(writer, coordinator, *json).await,
            Some(ChildrenAction::Add { name, birthdate }) => {
                children::add(writer, coordinator, name, birthdate.as_deref()).await
            }
            Some(ChildrenAction::Remove { id }) => children::remove(writer, coordinator, id).await,
        },
        Commands::Feed { child, json } => {
            feed::run(writer, coordinator, config, child.as_deref(), *json).await
        }
        Commands::Log(args) => log::run(writer, coordinator, config, args).await,
        Commands::SleepEnd(args) => sleep_end::run(writer, coordinator, config, args).await,
        Commands::Insights { child, json } => {
            insights::run(writer, coordinator, config, child.as_deref(), *json).await
        }
        Commands::Handoff { child } => {
            handoff::run(writer, coordinator, config, child.as_deref()).await
        }
        Commands::Voice { text, child } => {
            voice::run(writer, coordinator, config, text, child.as_deref()).await
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr; stdout carries command output
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (coordinator, config) = connect(cli.config.as_deref())?;
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    let mut stdout = std::io::stdout().lock();
    runtime.block_on(dispatch(&mut stdout, command, &coordinator, &config))
}

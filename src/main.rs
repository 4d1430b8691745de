mod cli;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Only warnings by default, RUST_LOG=debug shows stale discards and lifecycle steps
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { force } => {
            cli::commands::init::run(cli.config.as_deref(), *force).await?;
        }
        Commands::Stats => {
            cli::commands::stats::run(cli.load_config()?).await?;
        }
        Commands::Neighbors { user } => {
            cli::commands::neighbors::run(cli.load_config()?, *user).await?;
        }
        Commands::Recommend { user, count } => {
            cli::commands::recommend::run(cli.load_config()?, *user, *count).await?;
        }
        Commands::Path { start, end } => {
            cli::commands::path::run(cli.load_config()?, *start, *end).await?;
        }
        Commands::Communities => {
            cli::commands::communities::run(cli.load_config()?).await?;
        }
        Commands::Explore => {
            cli::commands::explore::run(cli.load_config()?).await?;
        }
    }

    Ok(())
}

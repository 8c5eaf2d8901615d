//! Stevedore CLI
//!
//! Deployment automation for ECS-backed services: registers new task
//! definition revisions, rolls them out to services, and keeps scheduled
//! rule targets pointed at the latest revision. Invoked by the CI platform
//! with its inputs supplied as environment variables.

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "stevedore")]
#[command(about = "ECS task definition deployment and scheduled-task automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stevedore=info,stevedore_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    handle_command(cli.command).await
}

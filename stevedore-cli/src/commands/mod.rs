//! Command handlers
//!
//! One module per subcommand. Each flow is written against the client
//! traits so it can be exercised with recorded fakes; the handlers wire in
//! the AWS-backed implementations.

mod deploy;
mod schedule;

#[cfg(test)]
pub(crate) mod testing;

use anyhow::Result;
use clap::Subcommand;
use tracing::{error, info};

use stevedore_client::OrchestrationApi;
use stevedore_core::task_definition::RegisterableTaskDefinition;

pub use deploy::DeployArgs;
pub use schedule::ScheduleArgs;

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Register a new task definition revision and roll it out to a service
    Deploy(DeployArgs),
    /// Repoint a scheduled rule's targets at the latest task definition revision
    Schedule(ScheduleArgs),
}

/// Routes a parsed command to its handler.
pub async fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Deploy(args) => deploy::handle_deploy(args).await,
        Commands::Schedule(args) => schedule::handle_schedule(args).await,
    }
}

/// Registers a payload, dumping its full contents on failure.
///
/// A rejected registration is the one place where the error alone is not
/// enough to debug remotely, so the attempted payload is logged alongside
/// it as pretty JSON.
pub(crate) async fn register_with_diagnostics(
    api: &impl OrchestrationApi,
    payload: &RegisterableTaskDefinition,
) -> Result<String> {
    match api.register_task_definition(payload).await {
        Ok(arn) => Ok(arn),
        Err(err) => {
            error!("failed to register task definition: {err}");
            if let Ok(contents) = serde_json::to_string_pretty(payload) {
                info!("attempted task definition contents:\n{contents}");
            }
            Err(err.into())
        }
    }
}

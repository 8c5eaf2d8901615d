//! Deploy command
//!
//! Renders a new task definition revision from the service's current one
//! (swapping in the freshly pushed image and any environment override),
//! registers it, validates the service is deployable, and triggers a
//! rolling update to the new revision.

use anyhow::Result;
use clap::Args;
use colored::*;
use std::path::PathBuf;
use tracing::info;

use stevedore_client::{EcsOrchestrationClient, OrchestrationApi};
use stevedore_core::env_file::EnvSource;
use stevedore_core::naming::DeploymentTarget;
use stevedore_core::service::{ServiceUpdate, ensure_deployable};
use stevedore_core::task_definition::RegisterableTaskDefinition;

use super::register_with_diagnostics;

/// Inputs for the deploy path. Every flag can also be supplied through the
/// environment variable the invoking CI platform sets.
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// AWS region to operate in
    #[arg(long, env = "AWS_REGION")]
    pub aws_region: String,

    /// Account owning the cluster and task definition family
    #[arg(long, env = "AWS_ACCOUNT_ID")]
    pub aws_account_id: String,

    /// Raw cluster name (e.g. demo-prod)
    #[arg(long, env = "CLUSTER_NAME")]
    pub cluster_name: String,

    /// Raw service name (e.g. api)
    #[arg(long, env = "SERVICE_NAME")]
    pub service_name: String,

    /// Registry the service's image is pushed to
    #[arg(long, env = "AWS_IMAGE_REPOSITORY")]
    pub image_repository: String,

    /// Number of tasks the service should run
    #[arg(long, env = "DESIRED_COUNT", default_value_t = 1)]
    pub desired_count: i32,

    /// Optional env-override file (.json, .env, or extension-less)
    #[arg(long, env = "ENV_FILE")]
    pub env_file: Option<PathBuf>,

    /// Start a new deployment even when the task definition is unchanged
    #[arg(
        long,
        env = "FORCE_NEW_DEPLOYMENT",
        default_value_t = false,
        value_parser = parse_bool_flag,
        action = clap::ArgAction::Set
    )]
    pub force_new_deployment: bool,
}

/// Parses a boolean flag value case-insensitively, so CI configurations
/// passing `True` or `FALSE` keep working.
fn parse_bool_flag(value: &str) -> Result<bool, String> {
    value
        .to_ascii_lowercase()
        .parse()
        .map_err(|_| format!("`{value}` is not a boolean (expected true or false)"))
}

/// Handle the deploy command with the AWS-backed client.
pub async fn handle_deploy(args: DeployArgs) -> Result<()> {
    let config = stevedore_client::load_sdk_config(&args.aws_region).await;
    let orchestration = EcsOrchestrationClient::new(&config);

    run_deploy(&orchestration, &args).await
}

/// The deploy flow, written against the orchestration trait.
pub(crate) async fn run_deploy(api: &impl OrchestrationApi, args: &DeployArgs) -> Result<()> {
    let target = DeploymentTarget::new(&args.cluster_name, &args.service_name);
    let family_arn = target.task_definition_arn(&args.aws_region, &args.aws_account_id);
    let image = target.image_uri(&args.image_repository);

    info!(
        "deploying {} in cluster {}",
        target.qualified_service_name(),
        target.cluster
    );
    info!("task definition family: {family_arn}");
    info!("image: {image}");

    // Resolve the override before any remote call: a bad env file must
    // fail the invocation without touching the orchestration API.
    let env_source = EnvSource::from_path(args.env_file.as_deref())?;
    let override_environment = env_source.load()?;

    let template = api.describe_task_definition(&family_arn).await?;
    let payload =
        RegisterableTaskDefinition::render(&template, Some(&image), &override_environment);
    let revision_arn = register_with_diagnostics(api, &payload).await?;

    let description = api
        .describe_service(&target.cluster, &target.qualified_service_name())
        .await?;
    ensure_deployable(&description)?;

    api.update_service(&ServiceUpdate {
        cluster: target.cluster.clone(),
        service: target.qualified_service_name(),
        desired_count: args.desired_count,
        task_definition_arn: revision_arn.clone(),
        force_new_deployment: args.force_new_deployment,
    })
    .await?;

    println!(
        "{}",
        format!("Deployment started: {revision_arn}").green().bold()
    );
    println!(
        "Watch its progress in the ECS console: {}",
        target.console_url(&args.aws_region).dimmed()
    );

    Ok(())
}

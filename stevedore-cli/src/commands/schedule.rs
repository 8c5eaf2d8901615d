//! Schedule command
//!
//! Reconciles a scheduled rule's targets with the latest task definition
//! revision: stale revisions are rewritten to the current ARN, and targets
//! that are already current get a freshly registered revision when an
//! environment override was supplied (that is the only way to push new
//! environment values to a scheduled task).

use anyhow::Result;
use clap::Args;
use colored::*;
use std::path::PathBuf;
use tracing::info;

use stevedore_client::{
    EcsOrchestrationClient, EventBridgeTriggerClient, OrchestrationApi, TriggerApi,
};
use stevedore_core::env_file::EnvSource;
use stevedore_core::naming::DeploymentTarget;
use stevedore_core::reconcile::{TargetRewrite, plan_target_reconciliation};
use stevedore_core::task_definition::RegisterableTaskDefinition;

use super::register_with_diagnostics;

/// Inputs for the schedule path.
#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// AWS region to operate in
    #[arg(long, env = "AWS_REGION")]
    pub aws_region: String,

    /// Account owning the task definition family and the rule
    #[arg(long, env = "AWS_ACCOUNT_ID")]
    pub aws_account_id: String,

    /// Raw cluster name (e.g. demo-prod)
    #[arg(long, env = "CLUSTER_NAME")]
    pub cluster_name: String,

    /// Raw service name (e.g. api)
    #[arg(long, env = "SERVICE_NAME")]
    pub service_name: String,

    /// Optional env-override file (.json, .env, or extension-less)
    #[arg(long, env = "ENV_FILE")]
    pub env_file: Option<PathBuf>,
}

/// Handle the schedule command with the AWS-backed clients.
pub async fn handle_schedule(args: ScheduleArgs) -> Result<()> {
    let config = stevedore_client::load_sdk_config(&args.aws_region).await;
    let orchestration = EcsOrchestrationClient::new(&config);
    let trigger = EventBridgeTriggerClient::new(&config);

    run_schedule(&orchestration, &trigger, &args).await
}

/// The reconciliation flow, written against the client traits.
pub(crate) async fn run_schedule(
    orchestration: &impl OrchestrationApi,
    trigger: &impl TriggerApi,
    args: &ScheduleArgs,
) -> Result<()> {
    let target = DeploymentTarget::new(&args.cluster_name, &args.service_name);
    let rule = target.event_rule_name();
    let family_arn = target.task_definition_arn(&args.aws_region, &args.aws_account_id);

    info!("reconciling scheduled rule {rule}");
    info!("task definition family: {family_arn}");

    let env_source = EnvSource::from_path(args.env_file.as_deref())?;
    let override_environment = env_source.load()?;

    // The unqualified family ARN resolves to the latest active revision.
    let template = orchestration.describe_task_definition(&family_arn).await?;
    info!("latest revision: {}", template.arn);

    let targets = trigger.list_targets(&rule).await?;
    let plan = plan_target_reconciliation(
        &template.arn,
        &targets.scheduled(),
        !override_environment.is_empty(),
    );

    if plan.is_empty() {
        info!("no changed task definition; rule {rule} is already current");
        return Ok(());
    }

    let mut rewrites = plan.revision_rewrites;

    if !plan.stale_environment_targets.is_empty() {
        info!(
            "registering a fresh revision of {} to push updated environment values",
            template.family
        );
        let payload = RegisterableTaskDefinition::render(&template, None, &override_environment);
        let fresh_arn = register_with_diagnostics(orchestration, &payload).await?;

        for target_id in plan.stale_environment_targets {
            rewrites.push(TargetRewrite {
                target_id,
                task_definition_arn: fresh_arn.clone(),
            });
        }
    }

    trigger.repoint_targets(&rule, targets, &rewrites).await?;

    println!(
        "{}",
        format!("Updated {} scheduled target(s) on {rule}", rewrites.len())
            .green()
            .bold()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{
        RecordingOrchestration, RecordingTrigger, active_service, rule_targets, template,
    };
    use std::io::Write;
    use stevedore_core::task_definition::EnvVar;

    const FAMILY_ARN: &str =
        "arn:aws:ecs:eu-west-1:123456789012:task-definition/demo-prod-api-service-task";

    fn args() -> ScheduleArgs {
        ScheduleArgs {
            aws_region: "eu-west-1".to_string(),
            aws_account_id: "123456789012".to_string(),
            cluster_name: "demo-prod".to_string(),
            service_name: "api".to_string(),
            env_file: None,
        }
    }

    fn orchestration(latest_revision: i32) -> RecordingOrchestration {
        RecordingOrchestration::new(
            template(
                &format!("{FAMILY_ARN}:{latest_revision}"),
                "demo-prod-api-service-task",
                latest_revision,
            ),
            active_service(),
            Some(format!("{FAMILY_ARN}:{}", latest_revision + 1)),
        )
    }

    fn rule_target(id: &str, revision: i32) -> (String, String) {
        (id.to_string(), format!("{FAMILY_ARN}:{revision}"))
    }

    fn trigger(entries: &[(String, String)]) -> RecordingTrigger {
        let pairs: Vec<(&str, &str)> = entries
            .iter()
            .map(|(id, arn)| (id.as_str(), arn.as_str()))
            .collect();
        RecordingTrigger::new(rule_targets(&pairs))
    }

    #[tokio::test]
    async fn test_current_target_without_override_is_a_noop() {
        let api = orchestration(3);
        let trigger = trigger(&[rule_target("t1", 3)]);

        run_schedule(&api, &trigger, &args()).await.unwrap();

        assert_eq!(api.calls(), vec!["DescribeTaskDefinition"]);
        assert_eq!(trigger.calls(), vec!["ListTargetsByRule"]);
        assert!(trigger.rewrites().is_empty());
    }

    #[tokio::test]
    async fn test_stale_revision_is_rewritten_without_registration() {
        let api = orchestration(4);
        let trigger = trigger(&[rule_target("t1", 3)]);

        run_schedule(&api, &trigger, &args()).await.unwrap();

        assert!(!api.calls().contains(&"RegisterTaskDefinition"));
        assert_eq!(
            trigger.rewrites(),
            vec![TargetRewrite {
                target_id: "t1".to_string(),
                task_definition_arn: format!("{FAMILY_ARN}:4"),
            }]
        );
    }

    #[tokio::test]
    async fn test_env_override_on_current_target_registers_fresh_revision() {
        let mut file = tempfile::NamedTempFile::with_suffix(".env").unwrap();
        write!(file, "FOO=bar\nBAZ=qux").unwrap();

        let api = orchestration(3);
        let trigger = trigger(&[rule_target("t1", 3)]);
        let mut args = args();
        args.env_file = Some(file.path().to_path_buf());

        run_schedule(&api, &trigger, &args).await.unwrap();

        // A fresh revision was registered carrying the new environment,
        // with the image left untouched.
        let registered = api.registered.lock().unwrap();
        assert_eq!(registered.len(), 1);
        assert_eq!(
            registered[0].container_definitions[0].environment,
            vec![EnvVar::new("FOO", "bar"), EnvVar::new("BAZ", "qux")]
        );
        assert_eq!(
            registered[0].container_definitions[0].image,
            "repo/app:previous"
        );

        assert_eq!(
            trigger.rewrites(),
            vec![TargetRewrite {
                target_id: "t1".to_string(),
                task_definition_arn: format!("{FAMILY_ARN}:4"),
            }]
        );
    }

    #[tokio::test]
    async fn test_stale_revision_with_override_skips_registration() {
        let mut file = tempfile::NamedTempFile::with_suffix(".env").unwrap();
        write!(file, "FOO=bar").unwrap();

        let api = orchestration(4);
        let trigger = trigger(&[rule_target("t1", 3)]);
        let mut args = args();
        args.env_file = Some(file.path().to_path_buf());

        run_schedule(&api, &trigger, &args).await.unwrap();

        // The revision bump wins; no extra registration happens.
        assert!(!api.calls().contains(&"RegisterTaskDefinition"));
        assert_eq!(
            trigger.rewrites()[0].task_definition_arn,
            format!("{FAMILY_ARN}:4")
        );
    }

    #[tokio::test]
    async fn test_foreign_family_targets_are_left_alone() {
        let api = orchestration(4);
        let trigger = trigger(&[(
            "t1".to_string(),
            "arn:aws:ecs:eu-west-1:123456789012:task-definition/other-task:1".to_string(),
        )]);

        run_schedule(&api, &trigger, &args()).await.unwrap();

        assert!(trigger.rewrites().is_empty());
        assert!(!trigger.calls().contains(&"PutTargets"));
    }

    #[tokio::test]
    async fn test_mixed_targets_are_pushed_in_one_call() {
        let mut file = tempfile::NamedTempFile::with_suffix(".env").unwrap();
        write!(file, "FOO=bar").unwrap();

        let api = orchestration(4);
        let trigger = trigger(&[rule_target("stale", 3), rule_target("current", 4)]);
        let mut args = args();
        args.env_file = Some(file.path().to_path_buf());

        run_schedule(&api, &trigger, &args).await.unwrap();

        assert_eq!(trigger.calls(), vec!["ListTargetsByRule", "PutTargets"]);
        let rewrites = trigger.rewrites();
        assert_eq!(rewrites.len(), 2);
        assert_eq!(rewrites[0].target_id, "stale");
        assert_eq!(rewrites[0].task_definition_arn, format!("{FAMILY_ARN}:4"));
        assert_eq!(rewrites[1].target_id, "current");
        // The already-current target moves to the freshly registered :5.
        assert_eq!(rewrites[1].task_definition_arn, format!("{FAMILY_ARN}:5"));
    }

    #[tokio::test]
    async fn test_rejected_target_updates_fail_the_run() {
        let api = orchestration(4);
        let mut trigger = trigger(&[rule_target("t1", 3)]);
        trigger.reject_put = Some((1, "t1: ValidationException bad arn".to_string()));

        let err = run_schedule(&api, &trigger, &args()).await.unwrap_err();

        assert!(trigger.calls().contains(&"PutTargets"));
        assert!(
            err.to_string()
                .contains("1 scheduled target update(s) rejected")
        );
        assert!(err.to_string().contains("t1: ValidationException bad arn"));
    }
}

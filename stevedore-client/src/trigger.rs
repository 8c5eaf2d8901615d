//! Trigger API client
//!
//! Trait seam for the scheduled-rule trigger API (list targets, replace
//! targets) plus the Amazon EventBridge implementation.

use async_trait::async_trait;
use aws_sdk_eventbridge::types::{PutTargetsResultEntry, Target};
use tracing::{debug, info};

use stevedore_core::reconcile::{ScheduledTarget, TargetRewrite};

use crate::error::{ClientError, Result};

/// The targets attached to a rule, captured in one list call.
///
/// Carries the full wire representation so the eventual replace call puts
/// back every target setting (input, role, retry policy) untouched, not
/// just the task definition reference the reconciler cares about.
#[derive(Debug, Clone)]
pub struct RuleTargets {
    targets: Vec<Target>,
}

impl RuleTargets {
    pub fn new(targets: Vec<Target>) -> Self {
        Self { targets }
    }

    /// Reduced view for reconciliation planning. Targets without task
    /// definition parameters (non-container targets) are not included.
    pub fn scheduled(&self) -> Vec<ScheduledTarget> {
        self.targets
            .iter()
            .filter_map(|target| {
                target.ecs_parameters().map(|params| ScheduledTarget {
                    id: target.id().to_string(),
                    task_definition_arn: params.task_definition_arn().to_string(),
                })
            })
            .collect()
    }

    /// Applies the planned rewrites in place. Targets not named by a
    /// rewrite keep their recorded task definition.
    fn apply(&mut self, rewrites: &[TargetRewrite]) {
        for target in &mut self.targets {
            let Some(rewrite) = rewrites.iter().find(|r| r.target_id == target.id) else {
                continue;
            };
            if let Some(params) = target.ecs_parameters.as_mut() {
                params.task_definition_arn = rewrite.task_definition_arn.clone();
            }
        }
    }
}

/// Remote operations against the scheduled-rule trigger API.
#[async_trait]
pub trait TriggerApi: Send + Sync {
    /// Lists the targets currently attached to a rule.
    async fn list_targets(&self, rule: &str) -> Result<RuleTargets>;

    /// Rewrites the recorded task definition ARN of the named targets.
    ///
    /// Takes the target list returned by [`Self::list_targets`], applies
    /// the rewrites in place, and pushes the whole list back in a single
    /// replace call, so unrelated target settings survive. Failed entries
    /// reported by the API are an error. There is no transactional guard
    /// against a concurrent writer between the read and the write.
    async fn repoint_targets(
        &self,
        rule: &str,
        targets: RuleTargets,
        rewrites: &[TargetRewrite],
    ) -> Result<()>;
}

/// Amazon EventBridge implementation of [`TriggerApi`]
#[derive(Debug, Clone)]
pub struct EventBridgeTriggerClient {
    client: aws_sdk_eventbridge::Client,
}

impl EventBridgeTriggerClient {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_eventbridge::Client::new(config),
        }
    }
}

#[async_trait]
impl TriggerApi for EventBridgeTriggerClient {
    async fn list_targets(&self, rule: &str) -> Result<RuleTargets> {
        debug!("listing targets for rule {rule}");

        let output = self
            .client
            .list_targets_by_rule()
            .rule(rule)
            .send()
            .await
            .map_err(|err| ClientError::lookup("ListTargetsByRule", &err))?;

        Ok(RuleTargets::new(output.targets.unwrap_or_default()))
    }

    async fn repoint_targets(
        &self,
        rule: &str,
        mut targets: RuleTargets,
        rewrites: &[TargetRewrite],
    ) -> Result<()> {
        targets.apply(rewrites);

        let output = self
            .client
            .put_targets()
            .rule(rule)
            .set_targets(Some(targets.targets))
            .send()
            .await
            .map_err(|err| ClientError::mutation("PutTargets", &err))?;

        if let Some(err) = rejected(output.failed_entry_count(), output.failed_entries()) {
            return Err(err);
        }

        info!("rewrote {} target(s) on rule {rule}", rewrites.len());
        Ok(())
    }
}

/// Turns a non-zero failed-entry count into the terminal error, carrying
/// each entry's id, code, and message.
fn rejected(failed: i32, entries: &[PutTargetsResultEntry]) -> Option<ClientError> {
    if failed <= 0 {
        return None;
    }
    let details = entries
        .iter()
        .map(|entry| {
            format!(
                "{}: {} {}",
                entry.target_id().unwrap_or("<unknown>"),
                entry.error_code().unwrap_or_default(),
                entry.error_message().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("; ");
    Some(ClientError::RejectedTargetUpdates { failed, details })
}

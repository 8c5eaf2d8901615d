//! Scheduled-target reconciliation planning
//!
//! Pure decision logic for the schedule path: given the latest task
//! definition ARN and a rule's current targets, decide which targets need
//! their recorded ARN rewritten and which need a fresh revision registered
//! to push new environment values. The remote calls happen elsewhere; this
//! module only plans.

use serde::{Deserialize, Serialize};

/// A scheduled rule's target, reduced to what reconciliation needs:
/// its identity within the rule and the task definition ARN it records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTarget {
    pub id: String,
    pub task_definition_arn: String,
}

/// One planned rewrite of a target's recorded task definition ARN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRewrite {
    pub target_id: String,
    pub task_definition_arn: String,
}

/// Outcome of planning one reconciliation pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Targets recording an older revision of the current family; rewrite
    /// them to the latest ARN.
    pub revision_rewrites: Vec<TargetRewrite>,
    /// Targets already at the latest revision whose environment is stale
    /// because an override file was supplied. These need one fresh revision
    /// registered, then a rewrite to it.
    pub stale_environment_targets: Vec<String>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.revision_rewrites.is_empty() && self.stale_environment_targets.is_empty()
    }
}

/// Strips the trailing revision segment from a revision-qualified task
/// definition ARN.
///
/// `.../task-definition/svc-task:12` becomes `.../task-definition/svc-task`;
/// an ARN without an all-digit final segment (i.e. already unqualified) is
/// returned unchanged. Parsing the ARN instead of truncating a fixed number
/// of characters keeps revisions >= 10 matching correctly.
pub fn family_reference(arn: &str) -> &str {
    match arn.rsplit_once(':') {
        Some((prefix, revision))
            if !revision.is_empty() && revision.bytes().all(|b| b.is_ascii_digit()) =>
        {
            prefix
        }
        _ => arn,
    }
}

/// Plans the reconciliation of a rule's targets against the latest task
/// definition ARN.
///
/// Targets recording a different family are left alone. For same-family
/// targets: a differing revision plans a rewrite to `current_arn`; an
/// identical ARN plans a fresh registration only when an environment
/// override was supplied.
pub fn plan_target_reconciliation(
    current_arn: &str,
    targets: &[ScheduledTarget],
    has_environment_override: bool,
) -> ReconcilePlan {
    let current_family = family_reference(current_arn);
    let mut plan = ReconcilePlan::default();

    for target in targets {
        if family_reference(&target.task_definition_arn) != current_family {
            continue;
        }

        if target.task_definition_arn != current_arn {
            plan.revision_rewrites.push(TargetRewrite {
                target_id: target.id.clone(),
                task_definition_arn: current_arn.to_string(),
            });
        } else if has_environment_override {
            plan.stale_environment_targets.push(target.id.clone());
        }
    }

    plan
}

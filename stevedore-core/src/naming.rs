//! Naming derivations
//!
//! Every identifier this tool addresses is derived from the raw cluster and
//! service names by pure string transforms, with no external lookup. The
//! exact shapes are load-bearing: get one wrong and the tool talks to the
//! wrong orchestration object.

/// The cluster/service pair a deployment or schedule invocation operates on.
#[derive(Debug, Clone)]
pub struct DeploymentTarget {
    /// Raw cluster name as supplied (e.g. `demo-prod`)
    pub cluster: String,
    /// Raw service name as supplied (e.g. `api`)
    pub service: String,
}

impl DeploymentTarget {
    pub fn new(cluster: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            service: service.into(),
        }
    }

    /// `{cluster}-{service}-service`: the ECS service name.
    pub fn qualified_service_name(&self) -> String {
        format!("{}-{}-service", self.cluster, self.service)
    }

    /// `{qualified service name}-task`: the task definition family.
    pub fn task_family(&self) -> String {
        format!("{}-task", self.qualified_service_name())
    }

    /// `{cluster}-{service}-event-rule`: the scheduled rule name.
    pub fn event_rule_name(&self) -> String {
        format!("{}-{}-event-rule", self.cluster, self.service)
    }

    /// Unqualified family ARN; the describe call resolves it to the latest
    /// active revision.
    pub fn task_definition_arn(&self, region: &str, account_id: &str) -> String {
        format!(
            "arn:aws:ecs:{region}:{account_id}:task-definition/{}",
            self.task_family()
        )
    }

    /// Image reference pushed by CI: the cluster name's dashes become path
    /// segments under the repository, and the tag is always `latest`.
    pub fn image_uri(&self, repository: &str) -> String {
        format!(
            "{repository}/{}/{}:latest",
            self.cluster.replace('-', "/"),
            self.service
        )
    }

    /// Console deep-link to the service's event feed, printed after a
    /// successful update so the rollout can be watched.
    pub fn console_url(&self, region: &str) -> String {
        format!(
            "https://console.aws.amazon.com/ecs/home?region={region}#/clusters/{}/services/{}/events",
            self.cluster,
            self.qualified_service_name()
        )
    }
}

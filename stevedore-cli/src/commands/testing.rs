//! Recorded fakes for the command flows
//!
//! Hand-rolled implementations of the client traits that answer from
//! canned data and record every call, so the flow tests can assert both
//! outcomes and which remote operations were (not) attempted.

use async_trait::async_trait;
use aws_sdk_eventbridge::types::{EcsParameters, Target};
use std::sync::Mutex;

use stevedore_client::{ClientError, OrchestrationApi, RuleTargets, TriggerApi};
use stevedore_core::reconcile::TargetRewrite;
use stevedore_core::service::{ServiceDescription, ServiceUpdate};
use stevedore_core::task_definition::{
    ContainerDefinition, EnvVar, RegisterableTaskDefinition, TaskDefinitionTemplate,
};

pub struct RecordingOrchestration {
    pub template: TaskDefinitionTemplate,
    pub service: ServiceDescription,
    /// ARN handed back by registration; `None` makes registration fail
    pub register_arn: Option<String>,
    pub calls: Mutex<Vec<&'static str>>,
    pub registered: Mutex<Vec<RegisterableTaskDefinition>>,
    pub updates: Mutex<Vec<ServiceUpdate>>,
}

impl RecordingOrchestration {
    pub fn new(
        template: TaskDefinitionTemplate,
        service: ServiceDescription,
        register_arn: Option<String>,
    ) -> Self {
        Self {
            template,
            service,
            register_arn,
            calls: Mutex::new(Vec::new()),
            registered: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrchestrationApi for RecordingOrchestration {
    async fn describe_task_definition(
        &self,
        _reference: &str,
    ) -> stevedore_client::Result<TaskDefinitionTemplate> {
        self.calls.lock().unwrap().push("DescribeTaskDefinition");
        Ok(self.template.clone())
    }

    async fn register_task_definition(
        &self,
        payload: &RegisterableTaskDefinition,
    ) -> stevedore_client::Result<String> {
        self.calls.lock().unwrap().push("RegisterTaskDefinition");
        self.registered.lock().unwrap().push(payload.clone());
        self.register_arn.clone().ok_or(ClientError::Mutation {
            operation: "RegisterTaskDefinition",
            message: "rejected by test double".to_string(),
        })
    }

    async fn describe_service(
        &self,
        _cluster: &str,
        _service: &str,
    ) -> stevedore_client::Result<ServiceDescription> {
        self.calls.lock().unwrap().push("DescribeServices");
        Ok(self.service.clone())
    }

    async fn update_service(&self, update: &ServiceUpdate) -> stevedore_client::Result<()> {
        self.calls.lock().unwrap().push("UpdateService");
        self.updates.lock().unwrap().push(update.clone());
        Ok(())
    }
}

pub struct RecordingTrigger {
    pub targets: RuleTargets,
    /// When set, the replace call reports this many failed entries with
    /// the given details instead of succeeding
    pub reject_put: Option<(i32, String)>,
    pub calls: Mutex<Vec<&'static str>>,
    pub rewrites: Mutex<Vec<TargetRewrite>>,
}

impl RecordingTrigger {
    pub fn new(targets: RuleTargets) -> Self {
        Self {
            targets,
            reject_put: None,
            calls: Mutex::new(Vec::new()),
            rewrites: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn rewrites(&self) -> Vec<TargetRewrite> {
        self.rewrites.lock().unwrap().clone()
    }
}

#[async_trait]
impl TriggerApi for RecordingTrigger {
    async fn list_targets(&self, _rule: &str) -> stevedore_client::Result<RuleTargets> {
        self.calls.lock().unwrap().push("ListTargetsByRule");
        Ok(self.targets.clone())
    }

    async fn repoint_targets(
        &self,
        _rule: &str,
        _targets: RuleTargets,
        rewrites: &[TargetRewrite],
    ) -> stevedore_client::Result<()> {
        self.calls.lock().unwrap().push("PutTargets");
        self.rewrites.lock().unwrap().extend(rewrites.to_vec());
        match &self.reject_put {
            Some((failed, details)) => Err(ClientError::RejectedTargetUpdates {
                failed: *failed,
                details: details.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Builds a rule's target list from `(id, task definition ARN)` pairs.
pub fn rule_targets(entries: &[(&str, &str)]) -> RuleTargets {
    RuleTargets::new(
        entries
            .iter()
            .map(|(id, arn)| {
                Target::builder()
                    .id(*id)
                    .arn("arn:aws:ecs:eu-west-1:123456789012:cluster/demo-prod")
                    .ecs_parameters(
                        EcsParameters::builder()
                            .task_definition_arn(*arn)
                            .build()
                            .unwrap(),
                    )
                    .build()
                    .unwrap()
            })
            .collect(),
    )
}

pub fn template(arn: &str, family: &str, revision: i32) -> TaskDefinitionTemplate {
    TaskDefinitionTemplate {
        arn: arn.to_string(),
        family: family.to_string(),
        revision,
        cpu: Some("256".to_string()),
        memory: Some("512".to_string()),
        network_mode: Some("awsvpc".to_string()),
        execution_role_arn: Some("arn:aws:iam::123456789012:role/exec".to_string()),
        requires_compatibilities: vec!["FARGATE".to_string()],
        container_definitions: vec![ContainerDefinition {
            name: "app".to_string(),
            image: "repo/app:previous".to_string(),
            cpu: 0,
            memory: Some(512),
            port_mappings: vec![],
            environment: vec![EnvVar::new("MODE", "live")],
            mount_points: vec![],
            volumes_from: vec![],
            log_configuration: None,
        }],
    }
}

pub fn active_service() -> ServiceDescription {
    ServiceDescription {
        failures: vec![],
        status: Some("ACTIVE".to_string()),
        deployment_controller: Some("ECS".to_string()),
    }
}

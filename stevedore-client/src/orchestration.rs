//! Orchestration API client
//!
//! Trait seam for the container orchestration API (describe/register task
//! definitions, describe/update services) plus the Amazon ECS
//! implementation. Flows depend on the trait so the branching logic can be
//! exercised against recorded fakes.

use async_trait::async_trait;
use tracing::{debug, info};

use stevedore_core::service::{ServiceDescription, ServiceFailure, ServiceUpdate};
use stevedore_core::task_definition::{RegisterableTaskDefinition, TaskDefinitionTemplate};

use crate::convert::{containers_to_sdk, template_from_sdk};
use crate::error::{ClientError, Result};

/// Remote operations against the orchestration control plane.
///
/// Each call is one sequential network round-trip; no operation here is
/// retried or run concurrently with another.
#[async_trait]
pub trait OrchestrationApi: Send + Sync {
    /// Fetches a task definition template.
    ///
    /// `reference` may be a revision-qualified ARN or an unqualified family
    /// ARN; the API resolves the latter to the latest active revision.
    async fn describe_task_definition(&self, reference: &str) -> Result<TaskDefinitionTemplate>;

    /// Registers the payload as a new revision of its family.
    ///
    /// # Returns
    /// The revision-qualified ARN of the newly created revision.
    async fn register_task_definition(
        &self,
        payload: &RegisterableTaskDefinition,
    ) -> Result<String>;

    /// Describes one service within a cluster.
    async fn describe_service(&self, cluster: &str, service: &str) -> Result<ServiceDescription>;

    /// Points the service at a new task definition revision.
    async fn update_service(&self, update: &ServiceUpdate) -> Result<()>;
}

/// Amazon ECS implementation of [`OrchestrationApi`]
#[derive(Debug, Clone)]
pub struct EcsOrchestrationClient {
    client: aws_sdk_ecs::Client,
}

impl EcsOrchestrationClient {
    /// Creates a client from a loaded SDK configuration.
    ///
    /// The region is carried by the configuration, threaded in explicitly
    /// by the caller; nothing here mutates process-wide state.
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_ecs::Client::new(config),
        }
    }
}

#[async_trait]
impl OrchestrationApi for EcsOrchestrationClient {
    async fn describe_task_definition(&self, reference: &str) -> Result<TaskDefinitionTemplate> {
        debug!("describing task definition {reference}");

        let output = self
            .client
            .describe_task_definition()
            .task_definition(reference)
            .send()
            .await
            .map_err(|err| ClientError::lookup("DescribeTaskDefinition", &err))?;

        let task_definition = output
            .task_definition()
            .ok_or_else(|| ClientError::NotFound(reference.to_string()))?;

        template_from_sdk(task_definition)
    }

    async fn register_task_definition(
        &self,
        payload: &RegisterableTaskDefinition,
    ) -> Result<String> {
        debug!("registering new revision of family {}", payload.family);

        let containers = containers_to_sdk(payload)?;

        let output = self
            .client
            .register_task_definition()
            .family(&payload.family)
            .set_cpu(payload.cpu.clone())
            .set_memory(payload.memory.clone())
            .set_execution_role_arn(payload.execution_role_arn.clone())
            .set_network_mode(
                payload
                    .network_mode
                    .as_deref()
                    .map(aws_sdk_ecs::types::NetworkMode::from),
            )
            .set_requires_compatibilities(Some(
                payload
                    .requires_compatibilities
                    .iter()
                    .map(|compatibility| {
                        aws_sdk_ecs::types::Compatibility::from(compatibility.as_str())
                    })
                    .collect(),
            ))
            .set_container_definitions(Some(containers))
            .send()
            .await
            .map_err(|err| ClientError::mutation("RegisterTaskDefinition", &err))?;

        let arn = output
            .task_definition()
            .and_then(|td| td.task_definition_arn())
            .ok_or(ClientError::MalformedResponse {
                operation: "RegisterTaskDefinition",
                message: "response carries no task definition ARN".to_string(),
            })?;

        info!("registered task definition revision {arn}");
        Ok(arn.to_string())
    }

    async fn describe_service(&self, cluster: &str, service: &str) -> Result<ServiceDescription> {
        debug!("describing service {service} in cluster {cluster}");

        let output = self
            .client
            .describe_services()
            .cluster(cluster)
            .services(service)
            .send()
            .await
            .map_err(|err| ClientError::lookup("DescribeServices", &err))?;

        let failures = output
            .failures()
            .iter()
            .map(|failure| ServiceFailure {
                arn: failure.arn().unwrap_or_default().to_string(),
                reason: failure.reason().unwrap_or_default().to_string(),
            })
            .collect();

        let found = output.services().first();

        Ok(ServiceDescription {
            failures,
            status: found.and_then(|svc| svc.status().map(str::to_string)),
            deployment_controller: found.and_then(|svc| {
                svc.deployment_controller()
                    .map(|controller| controller.r#type().as_str().to_string())
            }),
        })
    }

    async fn update_service(&self, update: &ServiceUpdate) -> Result<()> {
        info!(
            "updating service {} to {} (desired count {}, force new deployment: {})",
            update.service, update.task_definition_arn, update.desired_count,
            update.force_new_deployment
        );

        self.client
            .update_service()
            .cluster(&update.cluster)
            .service(&update.service)
            .desired_count(update.desired_count)
            .task_definition(&update.task_definition_arn)
            .force_new_deployment(update.force_new_deployment)
            .send()
            .await
            .map_err(|err| ClientError::mutation("UpdateService", &err))?;

        Ok(())
    }
}

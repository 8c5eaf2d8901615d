//! Mapping between the AWS SDK's ECS types and our domain types
//!
//! The domain model carries exactly the fields a re-registered revision
//! preserves; everything else the API returns is dropped here, on purpose.

use aws_sdk_ecs::types as ecs;
use stevedore_core::task_definition::{
    ContainerDefinition, EnvVar, LogConfiguration, LogSecret, MountPoint, PortMapping,
    RegisterableTaskDefinition, TaskDefinitionTemplate, VolumeFrom,
};

use crate::error::{ClientError, Result};

pub(crate) fn template_from_sdk(td: &ecs::TaskDefinition) -> Result<TaskDefinitionTemplate> {
    let arn = td
        .task_definition_arn()
        .ok_or(ClientError::MalformedResponse {
            operation: "DescribeTaskDefinition",
            message: "task definition has no ARN".to_string(),
        })?;

    Ok(TaskDefinitionTemplate {
        arn: arn.to_string(),
        family: td.family().unwrap_or_default().to_string(),
        revision: td.revision(),
        cpu: td.cpu().map(str::to_string),
        memory: td.memory().map(str::to_string),
        network_mode: td.network_mode().map(|mode| mode.as_str().to_string()),
        execution_role_arn: td.execution_role_arn().map(str::to_string),
        requires_compatibilities: td
            .requires_compatibilities()
            .iter()
            .map(|compatibility| compatibility.as_str().to_string())
            .collect(),
        container_definitions: td
            .container_definitions()
            .iter()
            .map(container_from_sdk)
            .collect(),
    })
}

fn container_from_sdk(container: &ecs::ContainerDefinition) -> ContainerDefinition {
    ContainerDefinition {
        name: container.name().unwrap_or_default().to_string(),
        image: container.image().unwrap_or_default().to_string(),
        cpu: container.cpu(),
        memory: container.memory(),
        port_mappings: container
            .port_mappings()
            .iter()
            .map(|mapping| PortMapping {
                container_port: mapping.container_port(),
                host_port: mapping.host_port(),
                protocol: mapping.protocol().map(|p| p.as_str().to_string()),
            })
            .collect(),
        environment: container
            .environment()
            .iter()
            .filter_map(|pair| {
                pair.name().map(|name| {
                    EnvVar::new(name, pair.value().unwrap_or_default())
                })
            })
            .collect(),
        mount_points: container
            .mount_points()
            .iter()
            .map(|mount| MountPoint {
                source_volume: mount.source_volume().map(str::to_string),
                container_path: mount.container_path().map(str::to_string),
                read_only: mount.read_only(),
            })
            .collect(),
        volumes_from: container
            .volumes_from()
            .iter()
            .map(|volume| VolumeFrom {
                source_container: volume.source_container().map(str::to_string),
                read_only: volume.read_only(),
            })
            .collect(),
        log_configuration: container.log_configuration().map(log_configuration_from_sdk),
    }
}

fn log_configuration_from_sdk(config: &ecs::LogConfiguration) -> LogConfiguration {
    LogConfiguration {
        log_driver: config.log_driver().as_str().to_string(),
        options: config.options.clone(),
        secret_options: config.secret_options.as_ref().map(|secrets| {
            secrets
                .iter()
                .map(|secret| LogSecret {
                    name: secret.name().to_string(),
                    value_from: secret.value_from().to_string(),
                })
                .collect()
        }),
    }
}

pub(crate) fn containers_to_sdk(
    payload: &RegisterableTaskDefinition,
) -> Result<Vec<ecs::ContainerDefinition>> {
    payload
        .container_definitions
        .iter()
        .map(container_to_sdk)
        .collect()
}

fn container_to_sdk(container: &ContainerDefinition) -> Result<ecs::ContainerDefinition> {
    let mut builder = ecs::ContainerDefinition::builder()
        .name(&container.name)
        .image(&container.image)
        .cpu(container.cpu)
        .set_memory(container.memory)
        .set_port_mappings(Some(
            container
                .port_mappings
                .iter()
                .map(|mapping| {
                    ecs::PortMapping::builder()
                        .set_container_port(mapping.container_port)
                        .set_host_port(mapping.host_port)
                        .set_protocol(
                            mapping
                                .protocol
                                .as_deref()
                                .map(ecs::TransportProtocol::from),
                        )
                        .build()
                })
                .collect(),
        ))
        .set_environment(Some(
            container
                .environment
                .iter()
                .map(|pair| {
                    ecs::KeyValuePair::builder()
                        .name(&pair.name)
                        .value(&pair.value)
                        .build()
                })
                .collect(),
        ))
        .set_mount_points(Some(
            container
                .mount_points
                .iter()
                .map(|mount| {
                    ecs::MountPoint::builder()
                        .set_source_volume(mount.source_volume.clone())
                        .set_container_path(mount.container_path.clone())
                        .set_read_only(mount.read_only)
                        .build()
                })
                .collect(),
        ))
        .set_volumes_from(Some(
            container
                .volumes_from
                .iter()
                .map(|volume| {
                    ecs::VolumeFrom::builder()
                        .set_source_container(volume.source_container.clone())
                        .set_read_only(volume.read_only)
                        .build()
                })
                .collect(),
        ));

    if let Some(config) = &container.log_configuration {
        builder = builder.log_configuration(log_configuration_to_sdk(config)?);
    }

    Ok(builder.build())
}

fn log_configuration_to_sdk(config: &LogConfiguration) -> Result<ecs::LogConfiguration> {
    let secret_options = config
        .secret_options
        .as_ref()
        .map(|secrets| {
            secrets
                .iter()
                .map(|secret| {
                    ecs::Secret::builder()
                        .name(&secret.name)
                        .value_from(&secret.value_from)
                        .build()
                        .map_err(|err| ClientError::InvalidPayload(err.to_string()))
                })
                .collect::<Result<Vec<_>>>()
        })
        .transpose()?;

    ecs::LogConfiguration::builder()
        .log_driver(ecs::LogDriver::from(config.log_driver.as_str()))
        .set_options(config.options.clone())
        .set_secret_options(secret_options)
        .build()
        .map_err(|err| ClientError::InvalidPayload(err.to_string()))
}

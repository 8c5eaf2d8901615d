//! Task definition domain types
//!
//! Mirrors the subset of the ECS task definition model this tool reads and
//! writes. Serialization uses camelCase so diagnostic dumps of a
//! registration payload read like the ECS API JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::merge::merge_container_definitions;

/// A single environment variable on a container definition.
///
/// Order is preserved wherever these appear; names are unique within one
/// container's environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Immutable snapshot of a task definition fetched from the orchestration
/// API. Read-only; fetched fresh per invocation and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinitionTemplate {
    /// Revision-qualified ARN (`...task-definition/family:revision`)
    pub arn: String,
    /// Stable family identifier
    pub family: String,
    /// Monotonically increasing revision number
    pub revision: i32,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub network_mode: Option<String>,
    pub execution_role_arn: Option<String>,
    pub requires_compatibilities: Vec<String>,
    pub container_definitions: Vec<ContainerDefinition>,
}

/// One container within a task definition.
///
/// Every field except `image` and `environment` is carried through
/// unchanged when a new revision is rendered; those two are replaced
/// wholesale when an override is supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDefinition {
    pub name: String,
    pub image: String,
    pub cpu: i32,
    pub memory: Option<i32>,
    pub port_mappings: Vec<PortMapping>,
    pub environment: Vec<EnvVar>,
    pub mount_points: Vec<MountPoint>,
    pub volumes_from: Vec<VolumeFrom>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_configuration: Option<LogConfiguration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    pub container_port: Option<i32>,
    pub host_port: Option<i32>,
    pub protocol: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountPoint {
    pub source_volume: Option<String>,
    pub container_path: Option<String>,
    pub read_only: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeFrom {
    pub source_container: Option<String>,
    pub read_only: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfiguration {
    pub log_driver: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_options: Option<Vec<LogSecret>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSecret {
    pub name: String,
    pub value_from: String,
}

/// Payload registered as a new task definition revision.
///
/// Deliberately omits the fetched ARN and revision number: registration
/// always creates a new revision under the same family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterableTaskDefinition {
    pub family: String,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub execution_role_arn: Option<String>,
    pub network_mode: Option<String>,
    pub requires_compatibilities: Vec<String>,
    pub container_definitions: Vec<ContainerDefinition>,
}

impl RegisterableTaskDefinition {
    /// Assembles a registerable payload from a fetched template.
    ///
    /// Task-level settings are carried through unchanged; the container
    /// definitions go through [`merge_container_definitions`], which
    /// replaces image and environment only when an override is present.
    pub fn render(
        template: &TaskDefinitionTemplate,
        new_image: Option<&str>,
        override_environment: &[EnvVar],
    ) -> Self {
        Self {
            family: template.family.clone(),
            cpu: template.cpu.clone(),
            memory: template.memory.clone(),
            execution_role_arn: template.execution_role_arn.clone(),
            network_mode: template.network_mode.clone(),
            requires_compatibilities: template.requires_compatibilities.clone(),
            container_definitions: merge_container_definitions(
                &template.container_definitions,
                new_image,
                override_environment,
            ),
        }
    }
}

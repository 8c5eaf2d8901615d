//! Container definition merge
//!
//! The one transform applied when rendering a new task definition revision:
//! image and environment are replaced when an override is supplied, every
//! other field is carried through unchanged.

use crate::task_definition::{ContainerDefinition, EnvVar};

/// Produces new container definitions from the existing ones.
///
/// - `image` is replaced with `new_image` when provided, otherwise kept.
/// - `environment` is replaced wholesale with `override_environment` when it
///   is non-empty, otherwise the existing sequence is kept verbatim. An
///   empty override means "no override", distinguished by length.
/// - All other fields (name, cpu, memory, port mappings, mount points,
///   volumes-from, log configuration) are preserved.
///
/// The same transform is applied to every container in the task definition;
/// there is no per-container targeting. A multi-container task definition
/// receives the same image and environment override on all of its
/// containers (known limitation, kept deliberately).
pub fn merge_container_definitions(
    existing: &[ContainerDefinition],
    new_image: Option<&str>,
    override_environment: &[EnvVar],
) -> Vec<ContainerDefinition> {
    existing
        .iter()
        .map(|container| {
            let mut merged = container.clone();
            if let Some(image) = new_image {
                merged.image = image.to_string();
            }
            if !override_environment.is_empty() {
                merged.environment = override_environment.to_vec();
            }
            merged
        })
        .collect()
}

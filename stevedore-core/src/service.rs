//! Service state validation
//!
//! The deploy path refuses to touch a service that is not plainly
//! deployable: the describe call must report no failures, the service must
//! be ACTIVE, and it must use the native rolling-update controller (or
//! none). Anything else is a hard failure, not a fallback path.

use crate::error::ValidationError;

/// What the deploy path needs to know about a described service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDescription {
    /// Failure entries reported by the describe call (missing service, etc.)
    pub failures: Vec<ServiceFailure>,
    /// Service status, when the service was found
    pub status: Option<String>,
    /// Deployment controller type, when one is set on the service
    pub deployment_controller: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFailure {
    pub arn: String,
    pub reason: String,
}

/// Parameters of the rolling update that concludes a deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUpdate {
    pub cluster: String,
    pub service: String,
    pub desired_count: i32,
    pub task_definition_arn: String,
    pub force_new_deployment: bool,
}

/// Native rolling-update controller; the only one this tool supports.
const NATIVE_CONTROLLER: &str = "ECS";

const ACTIVE_STATUS: &str = "ACTIVE";

/// Checks that a described service can receive a rolling update.
///
/// Surfaces the first failure entry when the lookup reported any, then
/// requires ACTIVE status and an absent-or-native deployment controller.
/// Other controller types are a deliberate non-goal.
pub fn ensure_deployable(description: &ServiceDescription) -> Result<(), ValidationError> {
    if let Some(failure) = description.failures.first() {
        return Err(ValidationError::ServiceLookupFailed {
            arn: failure.arn.clone(),
            reason: failure.reason.clone(),
        });
    }

    match description.status.as_deref() {
        Some(ACTIVE_STATUS) => {}
        Some(other) => return Err(ValidationError::ServiceNotActive(other.to_string())),
        None => return Err(ValidationError::ServiceNotActive("MISSING".to_string())),
    }

    match description.deployment_controller.as_deref() {
        None | Some(NATIVE_CONTROLLER) => Ok(()),
        Some(other) => Err(ValidationError::UnsupportedDeploymentController(
            other.to_string(),
        )),
    }
}

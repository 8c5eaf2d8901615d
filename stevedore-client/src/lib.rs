//! Stevedore API clients
//!
//! Trait seams for the two remote collaborators of the deployment flows —
//! the container orchestration API (Amazon ECS) and the scheduled-rule
//! trigger API (Amazon EventBridge) — together with their AWS SDK
//! implementations.
//!
//! The flows in the CLI depend only on the [`OrchestrationApi`] and
//! [`TriggerApi`] traits; the SDK-backed clients here are the production
//! implementations. Both are built from one explicitly loaded
//! [`aws_config::SdkConfig`] so the region is threaded through constructors
//! rather than living in process-wide mutable state.

pub mod error;
pub mod orchestration;
pub mod trigger;

mod convert;

pub use error::{ClientError, Result};
pub use orchestration::{EcsOrchestrationClient, OrchestrationApi};
pub use trigger::{EventBridgeTriggerClient, RuleTargets, TriggerApi};

use aws_config::{BehaviorVersion, Region};

/// Loads an SDK configuration for the given region.
///
/// Credentials come from the default provider chain (environment,
/// profile, instance metadata), matching how the invoking automation
/// platform supplies them.
pub async fn load_sdk_config(region: &str) -> aws_config::SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}

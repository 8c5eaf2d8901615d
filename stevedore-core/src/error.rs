//! Error types for configuration and pre-flight validation

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning CLI-style inputs into usable configuration.
///
/// All of these are fatal for the invocation and are raised before any
/// remote call is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The env-override file has an extension we do not know how to parse
    #[error(
        "unsupported env file type for {}: only .json, .env, or extension-less files are accepted",
        path.display()
    )]
    UnsupportedEnvFile {
        /// Path as supplied by the caller
        path: PathBuf,
    },

    /// The env-override file could not be read
    #[error("failed to read env file {}", path.display())]
    UnreadableEnvFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The structured env-override file is not a flat JSON object
    #[error("malformed JSON env file {}", path.display())]
    MalformedEnvFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised when a described service is not in a deployable state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The describe-services call reported a failure entry
    #[error("service lookup failed: {arn} is {reason}")]
    ServiceLookupFailed { arn: String, reason: String },

    /// The service exists but is not in the ACTIVE state
    #[error("service is {0}, expected ACTIVE")]
    ServiceNotActive(String),

    /// Only the native rolling-update controller is supported
    #[error("unsupported deployment controller: {0}")]
    UnsupportedDeploymentController(String),
}

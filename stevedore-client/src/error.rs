//! Error types for the remote API clients

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the orchestration or trigger APIs.
///
/// Every variant is terminal for the invocation; there are no retries in
/// this layer. The invoking automation platform re-runs on failure.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A describe/list call failed
    #[error("{operation} failed: {message}")]
    Lookup {
        operation: &'static str,
        message: String,
    },

    /// A register/update/put call failed
    #[error("{operation} failed: {message}")]
    Mutation {
        operation: &'static str,
        message: String,
    },

    /// A describe call succeeded but the requested object was not in it
    #[error("task definition not found: {0}")]
    NotFound(String),

    /// The API answered with a shape we cannot use
    #[error("malformed {operation} response: {message}")]
    MalformedResponse {
        operation: &'static str,
        message: String,
    },

    /// A payload could not be converted into the SDK's types
    #[error("invalid task definition payload: {0}")]
    InvalidPayload(String),

    /// The replace-targets call reported failed entries
    #[error("{failed} scheduled target update(s) rejected: {details}")]
    RejectedTargetUpdates { failed: i32, details: String },
}

impl ClientError {
    pub(crate) fn lookup<E>(operation: &'static str, err: &E) -> Self
    where
        E: std::error::Error,
    {
        Self::Lookup {
            operation,
            message: error_chain(err),
        }
    }

    pub(crate) fn mutation<E>(operation: &'static str, err: &E) -> Self
    where
        E: std::error::Error,
    {
        Self::Mutation {
            operation,
            message: error_chain(err),
        }
    }
}

/// Renders an error with its full source chain, so upstream SDK detail
/// (HTTP status, AWS error code, message) survives into our logs.
fn error_chain<E: std::error::Error>(err: &E) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

//! Orchestration error type.

use lectern_core::CoreError;
use lectern_gateway::GatewayError;

/// Errors raised by the orchestration layer.
///
/// Poll-loop timeouts never appear here: they are synthesized inside a
/// running loop and surfaced through view state, not through a `Result`.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// A gateway call failed (transport or non-2xx response).
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Input rejected before any network call.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The operation conflicts with the current view state.
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<CoreError> for JobError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Validation(msg) => Self::Validation(msg),
            CoreError::Conflict(msg) => Self::Conflict(msg),
        }
    }
}

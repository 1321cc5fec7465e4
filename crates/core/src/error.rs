//! Error types for the Speechlet protocol layer.
//!
//! Uses `thiserror` for ergonomic error definitions. Dispatch-level failures
//! ([`SkillError`]) are kept separate from the failures a handler can raise
//! so callers can tell a data problem ("no such intent") from a fault
//! ("handler crashed") without matching on strings.

use thiserror::Error;

/// The top-level failure outcome of one skill invocation.
///
/// Every variant is surfaced to the caller as a failure, never as a
/// malformed [`ResponseEnvelope`](crate::ResponseEnvelope).
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("Invalid applicationId: expected {expected}, got {actual}")]
    IdentityMismatch { expected: String, actual: String },

    #[error("Unsupported intent = {0}")]
    UnsupportedIntent(String),

    #[error("Handler fault in {stage}: {source}")]
    HandlerFault {
        stage: String,
        #[source]
        source: HandlerError,
    },

    #[error("Handler returned without sending a response")]
    ResponseNotSent,

    #[error("Invalid event: {0}")]
    InvalidEvent(String),
}

impl SkillError {
    /// Stable machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IdentityMismatch { .. } => "identity_mismatch",
            Self::UnsupportedIntent(_) => "unsupported_intent",
            Self::HandlerFault { .. } => "handler_fault",
            Self::ResponseNotSent => "response_not_sent",
            Self::InvalidEvent(_) => "invalid_event",
        }
    }
}

/// Errors raised by the single-use response context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    #[error("Response already sent for this request")]
    AlreadyCompleted,

    #[error("Response receiver dropped before completion")]
    Abandoned,
}

/// Errors raised by intent handlers and lifecycle hooks.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Failed(String),

    #[error("Response error: {0}")]
    Response(#[from] ResponseError),

    #[error("Compute invocation failed: {0}")]
    Invoke(#[from] InvokeError),
}

/// Errors from downstream compute invocations.
#[derive(Debug, Clone, Error)]
pub enum InvokeError {
    #[error("Compute function not found: {0}")]
    FunctionNotFound(String),

    #[error("Compute call to {function} failed with status {status_code}: {message}")]
    Status {
        function: String,
        status_code: u16,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid compute payload: {0}")]
    InvalidPayload(String),
}

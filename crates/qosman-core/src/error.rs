// ── Core error types ──
//
// Domain errors from qosman-core. Callers never see HTTP details directly:
// the `From<qosman_api::Error>` impl folds transport failures into
// `AgentUnavailable` and status failures into `AgentRejected`.

use thiserror::Error;

use crate::removal::RemovalFailure;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Topology ─────────────────────────────────────────────────────
    #[error("Server '{server}' is not assigned to any hypervisor")]
    UnresolvedServer { server: String },

    // ── Orchestrator input ───────────────────────────────────────────
    #[error("Unknown quality tag '{tag}' (expected one of LOW, MEDIUM, HIGH)")]
    UnknownQualityTag { tag: String },

    #[error("Malformed QoS annotation '{annotation}' on link '{link}' of record '{record}' (expected key:value)")]
    MalformedQosAnnotation {
        record: String,
        link: String,
        annotation: String,
    },

    #[error("Invalid allocation plan: {message}")]
    InvalidPlan { message: String },

    // ── Agent ────────────────────────────────────────────────────────
    #[error("Connectivity agent unavailable: {reason}")]
    AgentUnavailable { reason: String },

    #[error("Connectivity agent rejected the request: {message}")]
    AgentRejected {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    /// Best-effort removal finished but some deletions failed.
    #[error("Removal incomplete: {} of {attempted} deletions failed", .failures.len())]
    RemovalIncomplete {
        attempted: usize,
        failures: Vec<RemovalFailure>,
    },

    #[error("QoS '{qos_uuid}' has no queue ids left")]
    QueueIdExhausted { qos_uuid: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` if the error stems from orchestrator-supplied data
    /// rather than from the agent or the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownQualityTag { .. }
                | Self::MalformedQosAnnotation { .. }
                | Self::InvalidPlan { .. }
                | Self::UnresolvedServer { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<qosman_api::Error> for CoreError {
    fn from(err: qosman_api::Error) -> Self {
        match err {
            qosman_api::Error::Transport(ref e) => match e.status() {
                Some(status) => CoreError::AgentRejected {
                    message: e.to_string(),
                    status: Some(status.as_u16()),
                },
                None => CoreError::AgentUnavailable {
                    reason: e.to_string(),
                },
            },
            qosman_api::Error::Timeout { timeout_secs } => CoreError::AgentUnavailable {
                reason: format!("request timed out after {timeout_secs}s"),
            },
            qosman_api::Error::Unauthorized { message } => CoreError::AgentRejected {
                message: format!("unauthorized: {message}"),
                status: Some(401),
            },
            qosman_api::Error::Agent { status, message } => CoreError::AgentRejected {
                message,
                status: Some(status),
            },
            qosman_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid agent URL: {e}"),
            },
            qosman_api::Error::InvalidBaseUrl(url) => CoreError::Config {
                message: format!("Agent URL cannot be used as a base: {url}"),
            },
            qosman_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            qosman_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

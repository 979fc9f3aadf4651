use thiserror::Error;

/// Top-level error type for the `qosman-api` crate.
///
/// Covers every failure mode of a round trip to the connectivity-management
/// agent: transport, URL construction, TLS setup, non-success HTTP status and
/// undecodable bodies. `qosman-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The agent rejected the configured bearer token (HTTP 401).
    #[error("Unauthorized by agent: {message}")]
    Unauthorized { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured base URL cannot take path segments (e.g. `mailto:`).
    #[error("Agent base URL cannot be used as a base: {0}")]
    InvalidBaseUrl(String),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Agent ───────────────────────────────────────────────────────
    /// The agent answered with a non-success status.
    #[error("Agent error (HTTP {status}): {message}")]
    Agent { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Agent { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the agent reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Agent { status: 404, .. } => true,
            _ => false,
        }
    }

    /// The HTTP status the agent answered with, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Agent { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

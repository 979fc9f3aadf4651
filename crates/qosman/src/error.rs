//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use qosman_config::ConfigError;
use qosman_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const INPUT: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const AGENT: i32 = 8;
    pub const CONFIG: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Agent ────────────────────────────────────────────────────────
    #[error("Could not reach the connectivity agent: {reason}")]
    #[diagnostic(
        code(qosman::connection_failed),
        help(
            "Check that the agent is running and that agent.url is right.\n\
             Override it with --agent URL or QOSMAN_AGENT__URL."
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Agent rejected the request{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    #[diagnostic(code(qosman::agent_rejected))]
    AgentRejected {
        status: Option<u16>,
        message: String,
    },

    #[error("Removal incomplete: {failed} of {attempted} deletions failed")]
    #[diagnostic(
        code(qosman::removal_incomplete),
        help("{details}")
    )]
    RemovalIncomplete {
        attempted: usize,
        failed: usize,
        details: String,
    },

    // ── Input ────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(qosman::invalid_input),
        help("Run: qosman qualities to see the accepted quality tags")
    )]
    Input { message: String },

    #[error("Invalid JSON in {path}: {source}")]
    #[diagnostic(code(qosman::json))]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    #[diagnostic(code(qosman::yaml))]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(qosman::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(qosman::config),
        help("Run: qosman config show to inspect the resolved configuration")
    )]
    Config(#[from] ConfigError),

    #[error("Agent settings are unusable: {message}")]
    #[diagnostic(
        code(qosman::agent_config),
        help("Check agent.url and agent.ca_cert in the configuration")
    )]
    AgentConfig { message: String },

    // ── Internal / IO ────────────────────────────────────────────────
    #[error("Internal error: {message}")]
    #[diagnostic(code(qosman::internal))]
    Internal { message: String },

    #[error("Could not render output: {reason}")]
    #[diagnostic(code(qosman::output))]
    Output { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AgentRejected { .. } | Self::RemovalIncomplete { .. } => exit_code::AGENT,
            Self::Input { .. } | Self::Json { .. } | Self::Yaml { .. } => exit_code::INPUT,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Config(_) | Self::AgentConfig { .. } => exit_code::CONFIG,
            Self::Internal { .. } | Self::Output { .. } | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnresolvedServer { .. }
            | CoreError::UnknownQualityTag { .. }
            | CoreError::MalformedQosAnnotation { .. }
            | CoreError::InvalidPlan { .. } => CliError::Input {
                message: err.to_string(),
            },

            CoreError::AgentUnavailable { reason } => CliError::ConnectionFailed { reason },

            CoreError::AgentRejected { message, status } => {
                CliError::AgentRejected { status, message }
            }

            CoreError::RemovalIncomplete {
                attempted,
                failures,
            } => CliError::RemovalIncomplete {
                attempted,
                failed: failures.len(),
                details: failures
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n"),
            },

            CoreError::QueueIdExhausted { .. } => CliError::AgentRejected {
                status: None,
                message: err.to_string(),
            },

            CoreError::Config { message } => CliError::AgentConfig { message },

            CoreError::Internal(message) => CliError::Internal { message },
        }
    }
}

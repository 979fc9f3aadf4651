// ── Runtime configuration ──
//
// These types describe how to reach the agent and which fixed flow
// attributes to stamp on every flow. They never touch disk: qosman-config
// builds a `ManagerConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_PROTOCOL: &str = "udp";
pub const DEFAULT_PRIORITY: u16 = 2;

/// Fixed attributes of every generated flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSettings {
    /// Transport protocol matched by flows, also the key for flow deletion.
    pub protocol: String,
    pub priority: u16,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            protocol: DEFAULT_PROTOCOL.into(),
            priority: DEFAULT_PRIORITY,
        }
    }
}

/// TLS verification strategy for HTTPS agents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
}

/// Everything needed to build a [`QosManager`](crate::QosManager) against a live agent.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Agent base URL (e.g. `http://10.0.0.1:8091`).
    pub url: Url,
    pub tls: TlsVerification,
    /// Per-request timeout for agent calls.
    pub timeout: Duration,
    pub api_token: Option<SecretString>,
    pub flows: FlowSettings,
}

impl ManagerConfig {
    /// Config for `url` with a 30s timeout, system TLS and default flow settings.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            api_token: None,
            flows: FlowSettings::default(),
        }
    }
}

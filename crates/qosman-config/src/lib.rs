//! Configuration for the qosman QoS manager.
//!
//! A TOML file layered over compiled-in defaults, plus `QOSMAN_*`
//! environment overrides, translated into `qosman_core::ManagerConfig`.
//! The override file lives at a fixed path; when it is absent the bundled
//! defaults apply on their own.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use qosman_core::{FlowSettings, ManagerConfig, TlsVerification};

/// Override file consulted when no explicit path is given.
pub const OVERRIDE_PATH: &str = "/etc/qosman/qos.toml";

/// Defaults compiled into the binary.
pub const BUNDLED: &str = include_str!("../resources/qos.toml");

const ENV_PREFIX: &str = "QOSMAN_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentSection,

    #[serde(default)]
    pub flows: FlowSection,
}

/// Where and how to reach the connectivity agent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AgentSection {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Bearer token (plaintext; prefer `QOSMAN_AGENT__API_TOKEN`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// PEM file with the CA that signed the agent's certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout(),
            api_token: None,
            ca_cert: None,
        }
    }
}

/// Fixed attributes stamped on every flow.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FlowSection {
    #[serde(default = "default_protocol")]
    pub protocol: String,

    #[serde(default = "default_priority")]
    pub priority: u16,
}

impl Default for FlowSection {
    fn default() -> Self {
        Self {
            protocol: default_protocol(),
            priority: default_priority(),
        }
    }
}

fn default_url() -> String {
    "http://localhost:8091".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_protocol() -> String {
    qosman_core::config::DEFAULT_PROTOCOL.into()
}
fn default_priority() -> u16 {
    qosman_core::config::DEFAULT_PRIORITY
}

// ── Config source ───────────────────────────────────────────────────

/// Which file, if any, was layered over the bundled defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Override(PathBuf),
    Bundled,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Override(path) => write!(f, "{}", path.display()),
            Self::Bundled => f.write_str("bundled defaults"),
        }
    }
}

// ── Config loading ──────────────────────────────────────────────────

/// Layered figment: defaults, bundled TOML, `override_file` if it exists,
/// then environment.
pub fn figment(override_file: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::string(BUNDLED))
        .merge(Toml::file(override_file))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load from the fixed override path.
pub fn load_config() -> Result<(Config, ConfigSource), ConfigError> {
    load_from(Path::new(OVERRIDE_PATH))
}

/// Load using `override_file` in place of the fixed override path.
pub fn load_from(override_file: &Path) -> Result<(Config, ConfigSource), ConfigError> {
    let source = if override_file.is_file() {
        ConfigSource::Override(override_file.to_path_buf())
    } else {
        ConfigSource::Bundled
    };
    let config: Config = figment(override_file).extract()?;
    config.validate()?;
    debug!(%source, url = %config.agent.url, "configuration loaded");
    Ok((config, source))
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.agent_url()?;
        if self.agent.timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "agent.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.flows.protocol.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "flows.protocol".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    pub fn agent_url(&self) -> Result<url::Url, ConfigError> {
        self.agent
            .url
            .parse()
            .map_err(|e| ConfigError::Validation {
                field: "agent.url".into(),
                reason: format!("invalid URL '{}': {e}", self.agent.url),
            })
    }

    /// Build the core's runtime config.
    pub fn to_manager_config(&self) -> Result<ManagerConfig, ConfigError> {
        let mut config = ManagerConfig::new(self.agent_url()?);
        config.timeout = Duration::from_secs(self.agent.timeout_secs);
        config.api_token = self.agent.api_token.clone().map(SecretString::from);
        config.tls = match &self.agent.ca_cert {
            Some(path) => TlsVerification::CustomCa(path.clone()),
            None => TlsVerification::SystemDefaults,
        };
        config.flows = FlowSettings {
            protocol: self.flows.protocol.clone(),
            priority: self.flows.priority,
        };
        Ok(config)
    }

    /// Copy with the token masked, safe to print.
    pub fn redacted(&self) -> Self {
        let mut shown = self.clone();
        if shown.agent.api_token.is_some() {
            shown.agent.api_token = Some("****".into());
        }
        shown
    }

    /// TOML rendering of [`redacted`](Self::redacted).
    pub fn to_toml_redacted(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&self.redacted())?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    fn override_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn bundled_defaults_parse() {
        let config: Config = Figment::from(Toml::string(BUNDLED)).extract().unwrap();
        assert_eq!(config.flows, FlowSection::default());
        assert_eq!(config.agent.timeout_secs, 30);
        config.validate().unwrap();
    }

    #[test]
    fn missing_override_falls_back_to_bundled() {
        let dir = tempfile::tempdir().unwrap();
        let figment = figment(&dir.path().join("absent.toml"));
        let config: Config = figment.extract().unwrap();
        assert_eq!(config.flows.protocol, "udp");
        assert_eq!(config.flows.priority, 2);
        assert_eq!(config.agent.url, "http://localhost:8091");
    }

    #[test]
    fn override_file_wins_over_bundled() {
        let file = override_file(
            r#"
            [agent]
            url = "https://agent.example:8443"
            api_token = "s3cret"

            [flows]
            priority = 7
            "#,
        );
        let (config, source) = load_from(file.path()).unwrap();

        assert_eq!(source, ConfigSource::Override(file.path().to_path_buf()));
        assert_eq!(config.agent.url, "https://agent.example:8443");
        assert_eq!(config.flows.priority, 7);
        // untouched keys keep the bundled value
        assert_eq!(config.flows.protocol, "udp");

        let manager = config.to_manager_config().unwrap();
        assert_eq!(manager.url.as_str(), "https://agent.example:8443/");
        assert_eq!(manager.flows.priority, 7);
        assert_eq!(manager.api_token.unwrap().expose_secret(), "s3cret");
    }

    #[test]
    fn bad_url_is_a_validation_error() {
        let file = override_file("[agent]\nurl = \"not a url\"\n");
        let err = load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "agent.url"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let file = override_file("[agent]\ntimeout_secs = 0\n");
        assert!(matches!(
            load_from(file.path()),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn wrong_type_is_a_figment_error() {
        let file = override_file("[flows]\npriority = \"high\"\n");
        assert!(matches!(load_from(file.path()), Err(ConfigError::Figment(_))));
    }

    #[test]
    fn redacted_rendering_masks_token() {
        let mut config = Config::default();
        config.agent.api_token = Some("s3cret".into());
        let rendered = config.to_toml_redacted().unwrap();
        assert!(rendered.contains("****"));
        assert!(!rendered.contains("s3cret"));
    }
}

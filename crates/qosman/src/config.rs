//! CLI-aware configuration: `--config` and `--agent` on top of the shared loader.

use std::path::PathBuf;

use qosman_config::{Config, ConfigSource, OVERRIDE_PATH};
use qosman_core::ManagerConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Override file in effect: `--config` if given, the fixed path otherwise.
pub fn override_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(OVERRIDE_PATH))
}

/// Load configuration and apply CLI overrides.
///
/// An explicit `--config` must exist; the fixed path may be absent.
pub fn load(global: &GlobalOpts) -> Result<(Config, ConfigSource), CliError> {
    let (mut cfg, source) = match global.config {
        Some(ref path) if !path.is_file() => {
            return Err(CliError::Validation {
                field: "--config".into(),
                reason: format!("{} does not exist", path.display()),
            });
        }
        Some(ref path) => qosman_config::load_from(path)?,
        None => qosman_config::load_config()?,
    };
    if let Some(ref url) = global.agent {
        cfg.agent.url.clone_from(url);
        cfg.validate()?;
    }
    Ok((cfg, source))
}

/// Build the core's runtime config from file, environment and flags.
pub fn manager_config(global: &GlobalOpts) -> Result<ManagerConfig, CliError> {
    let (cfg, source) = load(global)?;
    tracing::debug!(%source, agent = %cfg.agent.url, "using configuration");
    Ok(cfg.to_manager_config()?)
}

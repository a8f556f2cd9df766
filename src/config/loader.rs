//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Optional path to a TOML config file.
pub const CONFIG_PATH_ENV_VAR: &str = "MARKET_CONFIG";
/// Overrides `node.url`.
pub const NODE_URL_ENV_VAR: &str = "APTOS_NODE_URL";
/// Overrides `observability.log_level`.
pub const LOG_LEVEL_ENV_VAR: &str = "MARKET_LOG_LEVEL";
/// Overrides `workflow.failure_policy`.
pub const FAILURE_POLICY_ENV_VAR: &str = "MARKET_FAILURE_POLICY";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {reason}")]
    Env { var: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Missing secret {0}")]
    MissingSecret(String),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML config file. Validation happens after env overrides.
fn read_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load configuration the way the binary does: defaults, then the file named
/// by `MARKET_CONFIG` if set, then environment overrides, then validation.
pub fn load_from_env() -> Result<AppConfig, ConfigError> {
    load_with(|key| std::env::var(key).ok())
}

/// Same as [`load_from_env`] with an injectable variable lookup.
pub fn load_with<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match lookup(CONFIG_PATH_ENV_VAR) {
        Some(path) => read_file(Path::new(&path))?,
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, &lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(node_url = %config.node.url, "Configuration loaded");
    Ok(config)
}

fn apply_env_overrides<F>(config: &mut AppConfig, lookup: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(NODE_URL_ENV_VAR) {
        config.node.url = url;
    }
    if let Some(level) = lookup(LOG_LEVEL_ENV_VAR) {
        config.observability.log_level = level;
    }
    if let Some(policy) = lookup(FAILURE_POLICY_ENV_VAR) {
        config.workflow.failure_policy = policy.parse().map_err(|reason| ConfigError::Env {
            var: FAILURE_POLICY_ENV_VAR,
            reason,
        })?;
    }
    Ok(())
}

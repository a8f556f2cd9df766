//! Configuration validation.
//!
//! Serde handles syntax; this checks value ranges and formats. All problems
//! are reported at once rather than stopping at the first.

use thiserror::Error;

use crate::blockchain::types::AccountAddress;
use crate::config::schema::AppConfig;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("node.url '{0}' is not a valid http(s) URL")]
    InvalidNodeUrl(String),

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    #[error("marketplace.module_address '{0}' is not a valid account address")]
    InvalidModuleAddress(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.node.url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidNodeUrl(config.node.url.clone())),
    }

    let positive = [
        ("node.request_timeout_secs", config.node.request_timeout_secs),
        ("node.max_gas_amount", config.node.max_gas_amount),
        ("node.expiration_secs", config.node.expiration_secs),
        ("confirmation.timeout_secs", config.confirmation.timeout_secs),
        ("confirmation.poll_interval_ms", config.confirmation.poll_interval_ms),
        ("token.supply", config.token.supply),
    ];
    for (field, value) in positive {
        if value == 0 {
            errors.push(ValidationError::NotPositive(field));
        }
    }

    if AccountAddress::parse(&config.marketplace.module_address).is_err() {
        errors.push(ValidationError::InvalidModuleAddress(
            config.marketplace.module_address.clone(),
        ));
    }

    let required = [
        ("marketplace.coin_type", &config.marketplace.coin_type),
        ("collection.name", &config.collection.name),
        ("token.name", &config.token.name),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(ValidationError::Empty(field));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

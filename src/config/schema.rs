//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Default full node; the public Aptos devnet.
pub const DEFAULT_NODE_URL: &str = "https://fullnode.devnet.aptoslabs.com";

/// Root configuration for the marketplace workflow.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Node endpoint and request settings.
    pub node: NodeConfig,

    /// Confirmation wait settings.
    pub confirmation: ConfirmationConfig,

    /// Deployed marketplace contract.
    pub marketplace: MarketplaceConfig,

    /// Terms passed to `list_nft` / `buy_token`.
    pub listing: ListingConfig,

    /// Collection to create.
    pub collection: CollectionConfig,

    /// Token to mint.
    pub token: TokenConfig,

    /// Step sequencing.
    pub workflow: WorkflowConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Node connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeConfig {
    /// REST endpoint; `/v1` is appended when missing.
    pub url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Gas ceiling for generated transactions.
    pub max_gas_amount: u64,

    /// Seconds from now until a generated transaction expires.
    pub expiration_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_NODE_URL.to_string(),
            request_timeout_secs: 10,
            max_gas_amount: 200_000,
            expiration_secs: 20,
        }
    }
}

/// How long and how often to poll for a committed transaction.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            poll_interval_ms: 1000,
        }
    }
}

/// Marketplace contract location.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MarketplaceConfig {
    /// Address the `marketplace` module is published under.
    pub module_address: String,

    /// Coin type used as the sole type argument.
    pub coin_type: String,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            module_address: "0x13875ee636300ec7031d1eefc82591b23263ea3665f870fb31abfd4fd713c779"
                .to_string(),
            coin_type: "0x1::aptos_coin::AptosCoin".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListingConfig {
    pub price: u64,
    pub expiration: u64,
    pub property_version: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            price: 100,
            expiration: 8_000_000,
            property_version: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CollectionConfig {
    pub name: String,
    pub description: String,
    pub uri: String,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            name: "Long's Collection".to_string(),
            description: "Collection of Long's NFT".to_string(),
            uri: "https://gamefi.org/api/v1/boxes/9".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    pub name: String,
    pub description: String,
    pub uri: String,
    pub supply: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "Long's Token".to_string(),
            description: "Long's NFT".to_string(),
            uri: "https://gamefi.org/api/v1/boxes/10".to_string(),
            supply: 1,
        }
    }
}

/// What to do with the remaining steps after one fails.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Run every step regardless of earlier failures.
    #[default]
    BestEffort,
    /// Skip the remaining steps after the first failure.
    FailFast,
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "best_effort" => Ok(FailurePolicy::BestEffort),
            "fail_fast" => Ok(FailurePolicy::FailFast),
            other => Err(format!("unknown failure policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WorkflowConfig {
    pub failure_policy: FailurePolicy,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.node.url, DEFAULT_NODE_URL);
        assert_eq!(config.confirmation.timeout_secs, 20);
        assert_eq!(config.token.supply, 1);
        assert_eq!(config.workflow.failure_policy, FailurePolicy::BestEffort);
    }

    #[test]
    fn test_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [node]
            url = "http://localhost:8080"

            [workflow]
            failure_policy = "fail_fast"

            [listing]
            price = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.node.url, "http://localhost:8080");
        assert_eq!(config.node.max_gas_amount, 200_000);
        assert_eq!(config.workflow.failure_policy, FailurePolicy::FailFast);
        assert_eq!(config.listing.price, 250);
        assert_eq!(config.listing.expiration, 8_000_000);
    }

    #[test]
    fn test_failure_policy_from_str() {
        assert_eq!("fail-fast".parse::<FailurePolicy>(), Ok(FailurePolicy::FailFast));
        assert_eq!("BEST_EFFORT".parse::<FailurePolicy>(), Ok(FailurePolicy::BestEffort));
        assert!("sometimes".parse::<FailurePolicy>().is_err());
    }
}

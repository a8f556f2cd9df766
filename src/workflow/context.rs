//! Everything a workflow run reads: identities, descriptors, contract terms.

use thiserror::Error;

use crate::blockchain::types::BlockchainError;
use crate::blockchain::wallet::{WalletIdentity, WalletRole};
use crate::config::loader::ConfigError;
use crate::config::schema::AppConfig;
use crate::config::secrets::SecretProvider;
use crate::marketplace::assets::{AssetError, CollectionDescriptor, TokenDescriptor};
use crate::marketplace::calls::{ListingTerms, MarketplaceModule};

#[derive(Debug, Error)]
pub enum ContextError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{role} wallet: {source}")]
    Wallet {
        role: WalletRole,
        #[source]
        source: BlockchainError,
    },

    #[error("Marketplace module: {0}")]
    Module(#[source] BlockchainError),

    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Immutable inputs for one or more workflow runs.
#[derive(Debug, Clone)]
pub struct WorkflowContext {
    pub seller: WalletIdentity,
    pub buyer: WalletIdentity,
    pub collection: CollectionDescriptor,
    pub token: TokenDescriptor,
    pub listing: ListingTerms,
    pub module: MarketplaceModule,
}

impl WorkflowContext {
    /// Build the context from configuration, pulling credentials from `secrets`.
    pub fn from_config(config: &AppConfig, secrets: &dyn SecretProvider) -> Result<Self, ContextError> {
        let seller = load_identity(secrets, WalletRole::Seller)?;
        let buyer = load_identity(secrets, WalletRole::Buyer)?;

        let collection = CollectionDescriptor::new(
            config.collection.name.as_str(),
            config.collection.description.as_str(),
            config.collection.uri.as_str(),
        )?;
        let token = TokenDescriptor::new(
            config.token.name.as_str(),
            config.token.description.as_str(),
            config.token.uri.as_str(),
            config.token.supply,
        )?;
        let module = MarketplaceModule::new(&config.marketplace.module_address, &config.marketplace.coin_type)
            .map_err(ContextError::Module)?;

        Ok(Self {
            seller,
            buyer,
            collection,
            token,
            listing: ListingTerms {
                price: config.listing.price,
                expiration: config.listing.expiration,
                property_version: config.listing.property_version,
            },
            module,
        })
    }
}

fn load_identity(secrets: &dyn SecretProvider, role: WalletRole) -> Result<WalletIdentity, ContextError> {
    let credentials = secrets.credentials(role)?;
    WalletIdentity::from_credentials(&credentials).map_err(|source| ContextError::Wallet { role, source })
}

//! Collection and token descriptors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("Token supply must be at least 1")]
    ZeroSupply,

    #[error("{0} name must not be empty")]
    EmptyName(&'static str),
}

/// Metadata for an NFT collection. The name is the key later calls refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDescriptor {
    name: String,
    description: String,
    uri: String,
}

impl CollectionDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        uri: impl Into<String>,
    ) -> Result<Self, AssetError> {
        let name = name.into();
        if name.is_empty() {
            return Err(AssetError::EmptyName("Collection"));
        }
        Ok(Self {
            name,
            description: description.into(),
            uri: uri.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

/// Metadata for a token minted into a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    name: String,
    description: String,
    uri: String,
    supply: u64,
}

impl TokenDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        uri: impl Into<String>,
        supply: u64,
    ) -> Result<Self, AssetError> {
        let name = name.into();
        if name.is_empty() {
            return Err(AssetError::EmptyName("Token"));
        }
        if supply == 0 {
            return Err(AssetError::ZeroSupply);
        }
        Ok(Self {
            name,
            description: description.into(),
            uri: uri.into(),
            supply,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn supply(&self) -> u64 {
        self.supply
    }
}

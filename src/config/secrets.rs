//! Wallet credential sources.
//!
//! Credentials are injected through [`SecretProvider`] so no key material is
//! compiled into the binary.

use std::collections::HashMap;

use crate::blockchain::wallet::{WalletCredentials, WalletRole};
use crate::config::loader::ConfigError;

/// Source of wallet credentials by role.
pub trait SecretProvider {
    fn credentials(&self, role: WalletRole) -> Result<WalletCredentials, ConfigError>;
}

/// Reads `{SELLER,BUYER}_{ADDRESS,PUBLIC_KEY,PRIVATE_KEY}` from the environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecretProvider;

impl EnvSecretProvider {
    fn var_name(role: WalletRole, field: &str) -> String {
        format!("{}_{}", role.as_str().to_ascii_uppercase(), field)
    }

    fn read(role: WalletRole, field: &str) -> Result<String, ConfigError> {
        let name = Self::var_name(role, field);
        std::env::var(&name).map_err(|_| ConfigError::MissingSecret(name))
    }
}

impl SecretProvider for EnvSecretProvider {
    fn credentials(&self, role: WalletRole) -> Result<WalletCredentials, ConfigError> {
        Ok(WalletCredentials {
            address: Self::read(role, "ADDRESS")?,
            public_key: Self::read(role, "PUBLIC_KEY")?,
            private_key: Self::read(role, "PRIVATE_KEY")?,
        })
    }
}

/// In-memory provider, for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct StaticSecretProvider {
    entries: HashMap<WalletRole, WalletCredentials>,
}

impl StaticSecretProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, role: WalletRole, credentials: WalletCredentials) -> Self {
        self.entries.insert(role, credentials);
        self
    }
}

impl SecretProvider for StaticSecretProvider {
    fn credentials(&self, role: WalletRole) -> Result<WalletCredentials, ConfigError> {
        self.entries
            .get(&role)
            .cloned()
            .ok_or_else(|| ConfigError::MissingSecret(format!("{role} credentials")))
    }
}

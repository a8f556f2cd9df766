//! Wallet identities and transaction signing.
//!
//! # Security
//! - Key material comes from a `SecretProvider`, never from constants
//! - Keys are never logged or serialized
//! - Key/address correspondence is not checked here; the node enforces it

use ed25519_dalek::{Signer, SigningKey};
use std::fmt;

use crate::blockchain::types::{AccountAddress, BlockchainError, BlockchainResult};

/// Length of an ed25519 private key seed.
const SEED_LEN: usize = 32;

/// Credentials as supplied by a secret provider (hex strings).
#[derive(Clone, PartialEq, Eq)]
pub struct WalletCredentials {
    pub address: String,
    pub public_key: String,
    pub private_key: String,
}

impl fmt::Debug for WalletCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletCredentials")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Role a wallet plays in the marketplace workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalletRole {
    /// Owns the collection, mints and lists the token.
    Seller,
    /// Purchases the listed token.
    Buyer,
}

impl WalletRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletRole::Seller => "seller",
            WalletRole::Buyer => "buyer",
        }
    }
}

impl fmt::Display for WalletRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address plus key pair for one workflow participant.
#[derive(Clone)]
pub struct WalletIdentity {
    address: AccountAddress,
    public_key: Vec<u8>,
    signing_key: SigningKey,
}

impl WalletIdentity {
    /// Build an identity from hex-encoded credentials.
    ///
    /// The public key is taken as supplied. The private key may be a 32-byte
    /// seed or a 64-byte seed followed by the public key; only the seed is used.
    pub fn from_credentials(credentials: &WalletCredentials) -> BlockchainResult<Self> {
        let address = AccountAddress::parse(&credentials.address)?;
        let public_key = decode_hex(&credentials.public_key, "public key")?;
        if public_key.len() != SEED_LEN {
            return Err(BlockchainError::Signing(format!(
                "Public key must be {SEED_LEN} bytes, got {}",
                public_key.len()
            )));
        }

        let private_key = decode_hex(&credentials.private_key, "private key")?;
        let seed: [u8; SEED_LEN] = match private_key.len() {
            32 | 64 => private_key[..SEED_LEN]
                .try_into()
                .map_err(|_| BlockchainError::Signing("Invalid private key length".to_string()))?,
            other => {
                return Err(BlockchainError::Signing(format!(
                    "Private key must be 32 or 64 bytes, got {other}"
                )))
            }
        };

        let identity = Self {
            address,
            public_key,
            signing_key: SigningKey::from_bytes(&seed),
        };

        tracing::debug!(address = %identity.address, "Wallet identity loaded");
        Ok(identity)
    }

    /// Get the wallet's address.
    pub fn address(&self) -> &AccountAddress {
        &self.address
    }

    /// Public key bytes as supplied.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Sign a signing message produced for a raw transaction.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl fmt::Debug for WalletIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletIdentity")
            .field("address", &self.address)
            .field("public_key", &format!("0x{}", hex::encode(&self.public_key)))
            .finish_non_exhaustive()
    }
}

fn decode_hex(input: &str, what: &str) -> BlockchainResult<Vec<u8>> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(digits)
        .map_err(|e| BlockchainError::Signing(format!("Invalid {what} format: {e}")))
}

//! Chain-specific types and error definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::blockchain::payload::EntryFunctionPayload;

/// Account address on the network, normalized to `0x` + lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountAddress(String);

impl AccountAddress {
    /// Maximum number of hex digits in an address (32 bytes).
    pub const MAX_HEX_LEN: usize = 64;

    /// Parse an address from hex, with or without the `0x` prefix.
    pub fn parse(input: &str) -> BlockchainResult<Self> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.is_empty() || digits.len() > Self::MAX_HEX_LEN {
            return Err(BlockchainError::InvalidAddress(input.to_string()));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(BlockchainError::InvalidAddress(input.to_string()));
        }

        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AccountAddress {
    type Error = BlockchainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccountAddress> for String {
    fn from(address: AccountAddress) -> Self {
        address.0
    }
}

/// Transaction hash exactly as reported by the node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TxHash {
    fn from(hash: &str) -> Self {
        Self(hash.to_string())
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Endpoint unreachable or the HTTP exchange failed.
    #[error("Network error: {0}")]
    Network(String),

    /// Request did not complete within the configured timeout.
    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    /// The node refused the transaction (simulation failure, abort, bad argument).
    #[error("Transaction rejected: {message}")]
    Rejected { status: Option<u16>, message: String },

    /// Malformed key material, or the node rejected the signature.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Transaction was not observed as committed within the wait window.
    #[error("Transaction not confirmed after {0} seconds")]
    ConfirmationTimeout(u64),

    /// The node answered with something we could not interpret.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Address string is not valid hex or is too long.
    #[error("Invalid account address: {0}")]
    InvalidAddress(String),
}

/// Coarse failure classes used for logging and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Network,
    Rejected,
    Signing,
    Protocol,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::Network => "network",
            ErrorClass::Rejected => "rejected",
            ErrorClass::Signing => "signing",
            ErrorClass::Protocol => "protocol",
        }
    }
}

impl BlockchainError {
    /// Classify the error into the network / rejected / signing taxonomy.
    pub fn class(&self) -> ErrorClass {
        match self {
            BlockchainError::Network(_)
            | BlockchainError::Timeout(_)
            | BlockchainError::ConfirmationTimeout(_) => ErrorClass::Network,
            BlockchainError::Rejected { .. } => ErrorClass::Rejected,
            BlockchainError::Signing(_) => ErrorClass::Signing,
            BlockchainError::InvalidResponse(_) | BlockchainError::InvalidAddress(_) => {
                ErrorClass::Protocol
            }
        }
    }

    pub(crate) fn rejected(status: Option<u16>, message: impl Into<String>) -> Self {
        BlockchainError::Rejected {
            status,
            message: message.into(),
        }
    }
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Transaction accepted by the node but not yet final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub hash: TxHash,
}

/// Unsigned transaction with the network-owned fields filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawTransaction {
    pub sender: AccountAddress,
    #[serde(with = "u64_string")]
    pub sequence_number: u64,
    #[serde(with = "u64_string")]
    pub max_gas_amount: u64,
    #[serde(with = "u64_string")]
    pub gas_unit_price: u64,
    #[serde(with = "u64_string")]
    pub expiration_timestamp_secs: u64,
    pub payload: EntryFunctionPayload,
}

/// Ed25519 signature envelope attached to a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionSignature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub public_key: String,
    pub signature: String,
}

impl TransactionSignature {
    pub fn ed25519(public_key: &[u8], signature: &[u8]) -> Self {
        Self {
            kind: "ed25519_signature",
            public_key: format!("0x{}", hex::encode(public_key)),
            signature: format!("0x{}", hex::encode(signature)),
        }
    }
}

/// Raw transaction plus signature, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedTransaction {
    #[serde(flatten)]
    pub raw: RawTransaction,
    pub signature: TransactionSignature,
}

/// Outcome reported by the node for a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub hash: TxHash,
    pub success: bool,
    pub vm_status: String,
    pub version: Option<u64>,
}

/// Options for waiting on a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaitOptions {
    /// Treat a committed-but-failed transaction as an error. When unset, the
    /// receipt is returned and its status says whether execution succeeded.
    pub check_success: bool,
}

/// Transaction confirmation status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Committed and executed successfully.
    Confirmed { version: Option<u64> },
    /// Committed but the VM reported failure (only when not checking success).
    Failed(String),
}

impl From<&TransactionReceipt> for ConfirmationStatus {
    fn from(receipt: &TransactionReceipt) -> Self {
        if receipt.success {
            ConfirmationStatus::Confirmed {
                version: receipt.version,
            }
        } else {
            ConfirmationStatus::Failed(receipt.vm_status.clone())
        }
    }
}

/// Result of a completed sign-and-submit run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub hash: TxHash,
    pub status: ConfirmationStatus,
}

/// The JSON API encodes u64 as decimal strings.
pub(crate) mod u64_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_normalization() {
        let addr = AccountAddress::parse("0xABCdef").unwrap();
        assert_eq!(addr.as_str(), "0xabcdef");

        let addr = AccountAddress::parse("  1f  ").unwrap();
        assert_eq!(addr.to_string(), "0x1f");
    }

    #[test]
    fn test_address_rejects_garbage() {
        assert!(AccountAddress::parse("").is_err());
        assert!(AccountAddress::parse("0x").is_err());
        assert!(AccountAddress::parse("0xzz").is_err());
        assert!(AccountAddress::parse(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = BlockchainError::Timeout(10);
        assert_eq!(err.to_string(), "Request timeout after 10 seconds");

        let err = BlockchainError::rejected(Some(400), "EINSUFFICIENT_BALANCE");
        assert!(err.to_string().contains("EINSUFFICIENT_BALANCE"));
    }

    #[test]
    fn test_error_classes() {
        assert_eq!(BlockchainError::Network("down".into()).class(), ErrorClass::Network);
        assert_eq!(BlockchainError::ConfirmationTimeout(20).class(), ErrorClass::Network);
        assert_eq!(BlockchainError::rejected(None, "abort").class(), ErrorClass::Rejected);
        assert_eq!(BlockchainError::Signing("bad key".into()).class(), ErrorClass::Signing);
        assert_eq!(
            BlockchainError::InvalidResponse("no hash".into()).class(),
            ErrorClass::Protocol
        );
    }

    #[test]
    fn test_wait_options_default_accepts_failed_execution() {
        assert!(!WaitOptions::default().check_success);
    }

    #[test]
    fn test_confirmation_status_from_receipt() {
        let receipt = TransactionReceipt {
            hash: TxHash::from("0x1"),
            success: false,
            vm_status: "Move abort".into(),
            version: Some(7),
        };
        assert_eq!(
            ConfirmationStatus::from(&receipt),
            ConfirmationStatus::Failed("Move abort".into())
        );
    }

    #[test]
    fn test_u64_fields_serialize_as_strings() {
        let raw = RawTransaction {
            sender: AccountAddress::parse("0x1").unwrap(),
            sequence_number: 5,
            max_gas_amount: 200_000,
            gas_unit_price: 100,
            expiration_timestamp_secs: 1_700_000_000,
            payload: EntryFunctionPayload::new(
                crate::blockchain::payload::EntryFunctionId::parse("0x1::coin::transfer").unwrap(),
                vec![],
                vec![],
            ),
        };
        let json = serde_json::to_value(&raw).unwrap();
        assert_eq!(json["sequence_number"], "5");
        assert_eq!(json["max_gas_amount"], "200000");
        assert_eq!(json["sender"], "0x1");
    }
}

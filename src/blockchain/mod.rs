//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! SecretProvider credentials
//!     → wallet.rs (identity, ed25519 signing)
//! payload.rs / token.rs (entry-function payloads)
//!     → transaction.rs (generate, sign, submit, confirm)
//!     → client.rs (NodeApi; REST calls with timeouts)
//! ```
//!
//! # Security Constraints
//! - Private keys only come from a secret provider
//! - Never log private keys or sensitive data
//! - All HTTP calls have a configurable timeout

pub mod client;
pub mod payload;
pub mod token;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{NodeApi, RestClient};
pub use payload::{EntryFunctionId, EntryFunctionPayload, MoveValue};
pub use transaction::{Stage, SubmitError, TransactionSubmitter};
pub use types::{AccountAddress, BlockchainError, BlockchainResult, TransactionRecord, TxHash};
pub use wallet::{WalletCredentials, WalletIdentity, WalletRole};

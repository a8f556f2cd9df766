//! Aptos NFT marketplace workflow runner library.

pub mod blockchain;
pub mod config;
pub mod marketplace;
pub mod observability;
pub mod workflow;

pub use blockchain::{NodeApi, RestClient, TransactionSubmitter, WalletIdentity};
pub use config::AppConfig;
pub use workflow::{WorkflowContext, WorkflowOrchestrator, WorkflowReport};

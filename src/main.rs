//! Aptos NFT marketplace workflow runner.
//!
//! Creates a collection, mints a token into it, lists the token on the
//! marketplace contract and buys it with a second wallet.
//!
//! # Architecture Overview
//!
//! ```text
//!   env / MARKET_CONFIG ──▶ config ──▶ WorkflowContext ◀── SecretProvider (env)
//!                                           │
//!                                           ▼
//!                                  WorkflowOrchestrator
//!                                   │               │
//!                    collection/token helpers   ListNft / BuyToken
//!                                   │               │
//!                                   │      TransactionSubmitter
//!                                   │   generate → sign → submit → confirm
//!                                   ▼               ▼
//!                               RestClient (NodeApi) ──▶ full node /v1
//! ```
//!
//! The process runs the workflow once and exits 0 whatever the step outcomes;
//! only startup problems (bad config, missing credentials) fail the process.

use aptos_nft_market::config::{self, EnvSecretProvider};
use aptos_nft_market::observability;
use aptos_nft_market::{RestClient, WorkflowContext, WorkflowOrchestrator};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_from_env()?;
    observability::logging::init(&config.observability.log_level);

    tracing::info!("aptos-nft-market v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        node_url = %config.node.url,
        failure_policy = ?config.workflow.failure_policy,
        confirmation_timeout_secs = config.confirmation.timeout_secs,
        "Configuration loaded"
    );

    let context = WorkflowContext::from_config(&config, &EnvSecretProvider)?;
    let client = RestClient::new(&config.node, &config.confirmation)?;

    let report = WorkflowOrchestrator::new(&client, &context, config.workflow.failure_policy)
        .run()
        .await;

    tracing::info!(
        run_id = %report.run_id,
        confirmed = report.confirmed(),
        failed = report.failed(),
        skipped = report.skipped(),
        "Workflow finished"
    );
    Ok(())
}

//! Node REST client.
//!
//! # Responsibilities
//! - Define the node operations the workflow depends on (`NodeApi`)
//! - Implement them against a full node's `/v1` REST API (`RestClient`)
//! - Classify failures as network, rejection or signing errors
//! - Poll for transaction commitment with a bounded wait

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::{interval, timeout};
use url::Url;

use crate::blockchain::payload::EntryFunctionPayload;
use crate::blockchain::token;
use crate::blockchain::transaction::{fail, Stage, SubmitError};
use crate::blockchain::types::{
    u64_string, AccountAddress, BlockchainError, BlockchainResult, PendingTransaction,
    RawTransaction, SignedTransaction, TransactionReceipt, TransactionSignature, TxHash,
    WaitOptions,
};
use crate::blockchain::wallet::WalletIdentity;
use crate::config::schema::{ConfirmationConfig, NodeConfig};
use crate::marketplace::assets::{CollectionDescriptor, TokenDescriptor};

/// Native coin; balances are reported in its smallest unit.
pub const NATIVE_COIN_TYPE: &str = "0x1::aptos_coin::AptosCoin";

/// Node statuses that mean the key material did not match the account.
const SIGNATURE_STATUSES: [&str; 2] = ["INVALID_SIGNATURE", "INVALID_AUTH_KEY"];

/// Operations the marketplace workflow needs from a node.
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// Native coin balance of an account. Read-only.
    async fn query_balance(&self, address: &AccountAddress) -> BlockchainResult<u64>;

    /// Submit a collection creation transaction for `creator`.
    ///
    /// Errors carry the stage the helper stopped at.
    async fn create_collection(
        &self,
        creator: &WalletIdentity,
        collection: &CollectionDescriptor,
    ) -> Result<PendingTransaction, SubmitError>;

    /// Submit a token creation transaction for `creator`.
    async fn create_token(
        &self,
        creator: &WalletIdentity,
        collection_name: &str,
        token: &TokenDescriptor,
    ) -> Result<PendingTransaction, SubmitError>;

    /// Fill in sequence number, gas and expiration for a payload.
    async fn generate_transaction(
        &self,
        sender: &AccountAddress,
        payload: &EntryFunctionPayload,
    ) -> BlockchainResult<RawTransaction>;

    async fn sign_transaction(
        &self,
        signer: &WalletIdentity,
        raw: RawTransaction,
    ) -> BlockchainResult<SignedTransaction>;

    /// Returns as soon as the node accepts the transaction into its mempool.
    async fn submit_transaction(
        &self,
        signed: &SignedTransaction,
    ) -> BlockchainResult<PendingTransaction>;

    /// Wait until the transaction is committed.
    async fn wait_for_transaction(
        &self,
        hash: &TxHash,
        options: WaitOptions,
    ) -> BlockchainResult<TransactionReceipt>;
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    #[serde(with = "u64_string")]
    sequence_number: u64,
}

#[derive(Debug, Deserialize)]
struct GasEstimateResponse {
    gas_estimate: u64,
}

#[derive(Debug, Deserialize)]
struct CoinStoreResponse {
    data: CoinStoreData,
}

#[derive(Debug, Deserialize)]
struct CoinStoreData {
    coin: CoinValue,
}

#[derive(Debug, Deserialize)]
struct CoinValue {
    #[serde(with = "u64_string")]
    value: u64,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    hash: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TransactionResponse {
    #[serde(rename = "type", default)]
    kind: String,
    success: Option<bool>,
    vm_status: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NodeErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    vm_error_code: Option<u64>,
}

/// `NodeApi` over a full node's REST API.
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
    config: NodeConfig,
    confirmation: ConfirmationConfig,
}

impl RestClient {
    /// Create a new client.
    ///
    /// No request is made here; an unreachable node only shows up on first use.
    pub fn new(config: &NodeConfig, confirmation: &ConfirmationConfig) -> BlockchainResult<Self> {
        let base_url = normalize_node_url(&config.url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| BlockchainError::Network(format!("Failed to build HTTP client: {e}")))?;

        tracing::info!(node_url = %base_url, "Node client initialized");

        Ok(Self {
            http,
            base_url,
            config: config.clone(),
            confirmation: confirmation.clone(),
        })
    }

    /// Base URL including the `/v1/` prefix.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> BlockchainResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| BlockchainError::Network(format!("Invalid endpoint '{path}': {e}")))
    }

    fn transport_error(&self, e: reqwest::Error) -> BlockchainError {
        if e.is_timeout() {
            BlockchainError::Timeout(self.config.request_timeout_secs)
        } else {
            BlockchainError::Network(e.to_string())
        }
    }

    /// GET returning `None` on 404.
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> BlockchainResult<Option<T>> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        self.read_json(response).await.map(Some)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> BlockchainResult<T> {
        self.get_optional(path)
            .await?
            .ok_or_else(|| BlockchainError::rejected(Some(404), format!("{path} not found")))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> BlockchainResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(&self, response: reqwest::Response) -> BlockchainResult<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| BlockchainError::InvalidResponse(e.to_string()));
        }

        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        Err(classify_error(status.as_u16(), &text))
    }

    /// Generate, sign and submit in one go, for the helper operations.
    async fn submit_payload(
        &self,
        sender: &WalletIdentity,
        payload: &EntryFunctionPayload,
    ) -> Result<PendingTransaction, SubmitError> {
        let function = payload.function().to_string();
        let raw = self
            .generate_transaction(sender.address(), payload)
            .await
            .map_err(|e| fail(Stage::Generate, &function, e))?;
        let signed = self
            .sign_transaction(sender, raw)
            .await
            .map_err(|e| fail(Stage::Sign, &function, e))?;
        self.submit_transaction(&signed)
            .await
            .map_err(|e| fail(Stage::Submit, &function, e))
    }
}

#[async_trait]
impl NodeApi for RestClient {
    async fn query_balance(&self, address: &AccountAddress) -> BlockchainResult<u64> {
        let path = format!("accounts/{address}/resource/0x1::coin::CoinStore<{NATIVE_COIN_TYPE}>");
        let store: CoinStoreResponse = self.get_json(&path).await?;
        Ok(store.data.coin.value)
    }

    async fn create_collection(
        &self,
        creator: &WalletIdentity,
        collection: &CollectionDescriptor,
    ) -> Result<PendingTransaction, SubmitError> {
        let payload = token::create_collection_payload(collection)
            .map_err(|e| fail(Stage::Generate, "create_collection_script", e))?;
        let pending = self.submit_payload(creator, &payload).await?;
        tracing::debug!(collection = collection.name(), hash = %pending.hash, "Collection creation submitted");
        Ok(pending)
    }

    async fn create_token(
        &self,
        creator: &WalletIdentity,
        collection_name: &str,
        token: &TokenDescriptor,
    ) -> Result<PendingTransaction, SubmitError> {
        let payload = token::create_token_payload(creator.address(), collection_name, token)
            .map_err(|e| fail(Stage::Generate, "create_token_script", e))?;
        let pending = self.submit_payload(creator, &payload).await?;
        tracing::debug!(token = token.name(), hash = %pending.hash, "Token creation submitted");
        Ok(pending)
    }

    async fn generate_transaction(
        &self,
        sender: &AccountAddress,
        payload: &EntryFunctionPayload,
    ) -> BlockchainResult<RawTransaction> {
        let account: AccountResponse = self.get_json(&format!("accounts/{sender}")).await?;
        let gas: GasEstimateResponse = self.get_json("estimate_gas_price").await?;

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        Ok(RawTransaction {
            sender: sender.clone(),
            sequence_number: account.sequence_number,
            max_gas_amount: self.config.max_gas_amount,
            gas_unit_price: gas.gas_estimate,
            expiration_timestamp_secs: now + self.config.expiration_secs,
            payload: payload.clone(),
        })
    }

    async fn sign_transaction(
        &self,
        signer: &WalletIdentity,
        raw: RawTransaction,
    ) -> BlockchainResult<SignedTransaction> {
        let message_hex: String = self.post_json("transactions/encode_submission", &raw).await?;
        let message = hex::decode(message_hex.trim_start_matches("0x")).map_err(|e| {
            BlockchainError::InvalidResponse(format!("Signing message is not hex: {e}"))
        })?;

        let signature = signer.sign(&message);
        Ok(SignedTransaction {
            raw,
            signature: TransactionSignature::ed25519(signer.public_key(), &signature),
        })
    }

    async fn submit_transaction(
        &self,
        signed: &SignedTransaction,
    ) -> BlockchainResult<PendingTransaction> {
        let response: SubmitResponse = self.post_json("transactions", signed).await?;
        let hash = response
            .hash
            .ok_or_else(|| BlockchainError::InvalidResponse("Submission returned no hash".to_string()))?;
        Ok(PendingTransaction { hash: TxHash(hash) })
    }

    async fn wait_for_transaction(
        &self,
        hash: &TxHash,
        options: WaitOptions,
    ) -> BlockchainResult<TransactionReceipt> {
        let timeout_secs = self.confirmation.timeout_secs;
        // interval() panics on a zero period
        let poll_interval = Duration::from_millis(self.confirmation.poll_interval_ms.max(1));
        let path = format!("transactions/by_hash/{hash}");

        let result = timeout(Duration::from_secs(timeout_secs), async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                let response = match self.get_optional::<TransactionResponse>(&path).await? {
                    Some(r) if r.kind != "pending_transaction" => r,
                    _ => {
                        tracing::debug!(tx_hash = %hash, "Transaction pending");
                        continue;
                    }
                };

                let receipt = TransactionReceipt {
                    hash: hash.clone(),
                    success: response.success.unwrap_or(false),
                    vm_status: response.vm_status.unwrap_or_default(),
                    version: response.version.and_then(|v| v.parse().ok()),
                };

                if options.check_success && !receipt.success {
                    return Err(BlockchainError::rejected(None, receipt.vm_status));
                }
                return Ok(receipt);
            }
        })
        .await;

        match result {
            Ok(receipt) => receipt,
            Err(_) => Err(BlockchainError::ConfirmationTimeout(timeout_secs)),
        }
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_secs", &self.config.request_timeout_secs)
            .finish()
    }
}

/// Ensure the URL ends with `/v1/` so relative joins land under the API root.
pub fn normalize_node_url(raw: &str) -> BlockchainResult<Url> {
    let mut url: Url = raw
        .parse()
        .map_err(|e| BlockchainError::Network(format!("Invalid node URL '{raw}': {e}")))?;

    let path = url.path().trim_end_matches('/').to_string();
    let path = if path.ends_with("/v1") {
        format!("{path}/")
    } else {
        format!("{path}/v1/")
    };
    url.set_path(&path);
    Ok(url)
}

/// Map a non-2xx node response onto the error taxonomy.
fn classify_error(status: u16, body: &str) -> BlockchainError {
    let parsed: NodeErrorBody = serde_json::from_str(body).unwrap_or_else(|_| NodeErrorBody {
        message: body.to_string(),
        ..NodeErrorBody::default()
    });

    let mut message = parsed.message;
    if let Some(code) = parsed.error_code {
        message = format!("{message} ({code})");
    }
    if let Some(vm_code) = parsed.vm_error_code {
        message = format!("{message} [vm_error_code {vm_code}]");
    }

    if SIGNATURE_STATUSES.iter().any(|s| message.contains(s)) {
        return BlockchainError::Signing(message);
    }
    if status >= 500 {
        return BlockchainError::Network(format!("HTTP {status}: {message}"));
    }
    BlockchainError::rejected(Some(status), message)
}

//! Shared utilities for integration tests.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use ed25519_dalek::SigningKey;
use serde_json::{json, Value};

use aptos_nft_market::blockchain::types::{
    PendingTransaction, RawTransaction, SignedTransaction, TransactionReceipt,
    TransactionSignature, WaitOptions,
};
use aptos_nft_market::blockchain::{
    AccountAddress, BlockchainError, BlockchainResult, EntryFunctionPayload, MoveValue, NodeApi,
    Stage, SubmitError, TxHash, WalletCredentials, WalletIdentity,
};
use aptos_nft_market::config::AppConfig;
use aptos_nft_market::marketplace::{CollectionDescriptor, TokenDescriptor};
use aptos_nft_market::WorkflowContext;

pub const SELLER_ADDRESS: &str = "0x5e11e5";
pub const BUYER_ADDRESS: &str = "0xb0b";

/// Credentials derived from a fixed seed byte.
pub fn credentials(address: &str, seed_byte: u8) -> WalletCredentials {
    let seed = [seed_byte; 32];
    let public = SigningKey::from_bytes(&seed).verifying_key().to_bytes();
    WalletCredentials {
        address: address.to_string(),
        public_key: format!("0x{}", hex::encode(public)),
        private_key: format!("0x{}", hex::encode(seed)),
    }
}

#[allow(dead_code)]
pub fn seller() -> WalletIdentity {
    WalletIdentity::from_credentials(&credentials(SELLER_ADDRESS, 1)).unwrap()
}

#[allow(dead_code)]
pub fn buyer() -> WalletIdentity {
    WalletIdentity::from_credentials(&credentials(BUYER_ADDRESS, 2)).unwrap()
}

/// Context built the way the binary builds it, with in-memory credentials.
#[allow(dead_code)]
pub fn test_context() -> WorkflowContext {
    use aptos_nft_market::blockchain::WalletRole;
    use aptos_nft_market::config::StaticSecretProvider;

    let secrets = StaticSecretProvider::new()
        .with(WalletRole::Seller, credentials(SELLER_ADDRESS, 1))
        .with(WalletRole::Buyer, credentials(BUYER_ADDRESS, 2));
    WorkflowContext::from_config(&AppConfig::default(), &secrets).unwrap()
}

// ---------------------------------------------------------------------------
// In-process NodeApi mock
// ---------------------------------------------------------------------------

/// Operations the mock can be told to fail.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Balance,
    CreateCollection,
    CreateToken,
    Generate,
    Sign,
    Submit,
    Wait,
}

/// One recorded call against the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Balance(String),
    CreateCollection { creator: String, name: String },
    CreateToken { creator: String, collection: String, token: String },
    Generate { sender: String, function: String, arguments: Vec<MoveValue> },
    Sign { signer: String },
    Submit { sender: String },
    Wait { hash: String, check_success: bool },
}

/// Records every call; succeeds unless an operation was marked failing.
#[derive(Debug, Default)]
pub struct MockNode {
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<Op>>,
    hash_counter: AtomicU32,
    balance: u64,
}

#[allow(dead_code)]
impl MockNode {
    pub fn new() -> Self {
        Self {
            balance: 1_000_000,
            ..Self::default()
        }
    }

    pub fn failing(self, op: Op) -> Self {
        self.failing.lock().unwrap().insert(op);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Business-level view of the call log: balance, helpers, and the
    /// function name of every generated transaction.
    pub fn business_ops(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Balance(_) => Some("balance".to_string()),
                Call::CreateCollection { .. } => Some("create_collection".to_string()),
                Call::CreateToken { .. } => Some("create_token".to_string()),
                Call::Generate { function, .. } => function.rsplit("::").next().map(str::to_string),
                _ => None,
            })
            .collect()
    }

    /// Hashes passed to `wait_for_transaction`, in order.
    pub fn waited_hashes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Wait { hash, .. } => Some(hash),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, op: Op) -> BlockchainResult<()> {
        if self.failing.lock().unwrap().contains(&op) {
            return Err(BlockchainError::Rejected {
                status: Some(400),
                message: format!("mock rejection of {op:?}"),
            });
        }
        Ok(())
    }

    /// Helpers fail at generate when generation is failing, otherwise at
    /// submit when their own operation is.
    fn check_helper(&self, op: Op) -> Result<(), SubmitError> {
        let stage = if self.failing.lock().unwrap().contains(&Op::Generate) {
            Stage::Generate
        } else {
            Stage::Submit
        };
        self.check(Op::Generate)
            .and_then(|_| self.check(op))
            .map_err(|source| SubmitError { stage, source })
    }

    fn next_hash(&self) -> TxHash {
        let n = self.hash_counter.fetch_add(1, Ordering::SeqCst);
        TxHash(format!("0xhash{n}"))
    }
}

#[async_trait]
impl NodeApi for MockNode {
    async fn query_balance(&self, address: &AccountAddress) -> BlockchainResult<u64> {
        self.record(Call::Balance(address.to_string()));
        self.check(Op::Balance)?;
        Ok(self.balance)
    }

    async fn create_collection(
        &self,
        creator: &WalletIdentity,
        collection: &CollectionDescriptor,
    ) -> Result<PendingTransaction, SubmitError> {
        self.record(Call::CreateCollection {
            creator: creator.address().to_string(),
            name: collection.name().to_string(),
        });
        self.check_helper(Op::CreateCollection)?;
        Ok(PendingTransaction { hash: self.next_hash() })
    }

    async fn create_token(
        &self,
        creator: &WalletIdentity,
        collection_name: &str,
        token: &TokenDescriptor,
    ) -> Result<PendingTransaction, SubmitError> {
        self.record(Call::CreateToken {
            creator: creator.address().to_string(),
            collection: collection_name.to_string(),
            token: token.name().to_string(),
        });
        self.check_helper(Op::CreateToken)?;
        Ok(PendingTransaction { hash: self.next_hash() })
    }

    async fn generate_transaction(
        &self,
        sender: &AccountAddress,
        payload: &EntryFunctionPayload,
    ) -> BlockchainResult<RawTransaction> {
        self.record(Call::Generate {
            sender: sender.to_string(),
            function: payload.function().to_string(),
            arguments: payload.arguments().to_vec(),
        });
        self.check(Op::Generate)?;
        Ok(RawTransaction {
            sender: sender.clone(),
            sequence_number: 0,
            max_gas_amount: 200_000,
            gas_unit_price: 100,
            expiration_timestamp_secs: 0,
            payload: payload.clone(),
        })
    }

    async fn sign_transaction(
        &self,
        signer: &WalletIdentity,
        raw: RawTransaction,
    ) -> BlockchainResult<SignedTransaction> {
        self.record(Call::Sign {
            signer: signer.address().to_string(),
        });
        if self.failing.lock().unwrap().contains(&Op::Sign) {
            return Err(BlockchainError::Signing("mock signature mismatch".to_string()));
        }
        let signature = signer.sign(b"mock signing message");
        Ok(SignedTransaction {
            raw,
            signature: TransactionSignature::ed25519(signer.public_key(), &signature),
        })
    }

    async fn submit_transaction(
        &self,
        signed: &SignedTransaction,
    ) -> BlockchainResult<PendingTransaction> {
        self.record(Call::Submit {
            sender: signed.raw.sender.to_string(),
        });
        self.check(Op::Submit)?;
        Ok(PendingTransaction { hash: self.next_hash() })
    }

    async fn wait_for_transaction(
        &self,
        hash: &TxHash,
        options: WaitOptions,
    ) -> BlockchainResult<TransactionReceipt> {
        self.record(Call::Wait {
            hash: hash.to_string(),
            check_success: options.check_success,
        });
        self.check(Op::Wait)?;
        Ok(TransactionReceipt {
            hash: hash.clone(),
            success: true,
            vm_status: "Executed successfully".to_string(),
            version: Some(1),
        })
    }
}

// ---------------------------------------------------------------------------
// HTTP mock node for RestClient
// ---------------------------------------------------------------------------

/// Programmable behavior of the HTTP mock node.
#[allow(dead_code)]
#[derive(Debug)]
pub struct NodeBehavior {
    pub balance: u64,
    pub sequence_number: u64,
    pub gas_estimate: u64,
    pub signing_message: String,
    pub submit_hash: String,
    /// Status and body returned by `POST /transactions` instead of success.
    pub submit_error: Option<(u16, Value)>,
    /// Number of polls answered as pending before the transaction commits.
    pub pending_polls: u32,
    /// Never find the transaction.
    pub never_commit: bool,
    /// Answer account lookups with 404.
    pub missing_account: bool,
    pub vm_success: bool,
}

impl Default for NodeBehavior {
    fn default() -> Self {
        Self {
            balance: 12_345,
            sequence_number: 7,
            gas_estimate: 100,
            signing_message: "0xdeadbeefcafe".to_string(),
            submit_hash: "0x9f2c".to_string(),
            submit_error: None,
            pending_polls: 0,
            never_commit: false,
            missing_account: false,
            vm_success: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct NodeState {
    pub behavior: NodeBehavior,
    pub polls: AtomicU32,
    pub encoded: Mutex<Vec<Value>>,
    pub submitted: Mutex<Vec<Value>>,
    pub paths: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl NodeState {
    pub fn new(behavior: NodeBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            ..Self::default()
        })
    }
}

async fn account(State(state): State<Arc<NodeState>>, Path(address): Path<String>) -> (StatusCode, Json<Value>) {
    state.paths.lock().unwrap().push(format!("accounts/{address}"));
    if state.behavior.missing_account {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": format!("Account not found: {address}"), "error_code": "account_not_found" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "sequence_number": state.behavior.sequence_number.to_string(),
            "authentication_key": address,
        })),
    )
}

async fn resource(
    State(state): State<Arc<NodeState>>,
    Path((address, resource)): Path<(String, String)>,
) -> Json<Value> {
    state.paths.lock().unwrap().push(format!("accounts/{address}/resource/{resource}"));
    Json(json!({
        "type": resource,
        "data": { "coin": { "value": state.behavior.balance.to_string() } },
    }))
}

async fn gas_price(State(state): State<Arc<NodeState>>) -> Json<Value> {
    Json(json!({ "gas_estimate": state.behavior.gas_estimate }))
}

async fn encode_submission(State(state): State<Arc<NodeState>>, Json(body): Json<Value>) -> Json<Value> {
    state.encoded.lock().unwrap().push(body);
    Json(Value::String(state.behavior.signing_message.clone()))
}

async fn submit(State(state): State<Arc<NodeState>>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    state.submitted.lock().unwrap().push(body);
    match &state.behavior.submit_error {
        Some((status, error)) => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST),
            Json(error.clone()),
        ),
        None => (
            StatusCode::ACCEPTED,
            Json(json!({ "hash": state.behavior.submit_hash })),
        ),
    }
}

async fn by_hash(State(state): State<Arc<NodeState>>, Path(hash): Path<String>) -> (StatusCode, Json<Value>) {
    let poll = state.polls.fetch_add(1, Ordering::SeqCst);
    if state.behavior.never_commit {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Transaction not found", "error_code": "transaction_not_found" })),
        );
    }
    if poll < state.behavior.pending_polls {
        return (
            StatusCode::OK,
            Json(json!({ "type": "pending_transaction", "hash": hash })),
        );
    }
    let vm_status = if state.behavior.vm_success {
        "Executed successfully"
    } else {
        "Move abort in 0x1::coin: EINSUFFICIENT_BALANCE(0x10006)"
    };
    (
        StatusCode::OK,
        Json(json!({
            "type": "user_transaction",
            "hash": hash,
            "version": "4242",
            "success": state.behavior.vm_success,
            "vm_status": vm_status,
        })),
    )
}

/// Start an HTTP mock node on an ephemeral port.
#[allow(dead_code)]
pub async fn start_mock_node(state: Arc<NodeState>) -> SocketAddr {
    let app = Router::new()
        .route("/v1/accounts/{address}", get(account))
        .route("/v1/accounts/{address}/resource/{resource}", get(resource))
        .route("/v1/estimate_gas_price", get(gas_price))
        .route("/v1/transactions/encode_submission", post(encode_submission))
        .route("/v1/transactions", post(submit))
        .route("/v1/transactions/by_hash/{hash}", get(by_hash))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

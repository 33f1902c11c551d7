//! Shared utilities for integration testing: an in-process mock RPC node
//! hosting the order contract.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ed25519_dalek::{Verifier, VerifyingKey};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use order_client::blockchain::transaction::{Action, PublicKey, Signature, SignedTransaction};
use order_client::blockchain::Wallet;
use order_client::config::ClientConfig;
use order_client::Order;

pub const CONTRACT_ID: &str = "orders.test.near";
pub const NETWORK_ID: &str = "localnet";
pub const BLOCK_HASH: [u8; 32] = [1u8; 32];

/// `ed25519:<base58>` seed secret for a test key.
pub fn secret_key(seed: u8) -> String {
    format!("ed25519:{}", bs58::encode([seed; 32]).into_string())
}

/// Public key string of the test key derived from `seed`.
pub fn public_key(seed: u8) -> String {
    Wallet::from_secret_key("probe", &secret_key(seed))
        .unwrap()
        .public_key()
        .to_string()
}

/// Write a key file for `account_id` into `key_store`.
pub fn write_credentials(key_store: &Path, account_id: &str, seed: u8) {
    let network_dir = key_store.join(NETWORK_ID);
    std::fs::create_dir_all(&network_dir).unwrap();
    let content = json!({
        "account_id": account_id,
        "public_key": public_key(seed),
        "private_key": secret_key(seed),
    });
    std::fs::write(network_dir.join(format!("{}.json", account_id)), content.to_string()).unwrap();
}

#[derive(Default)]
struct NodeState {
    /// account → (public key, nonce)
    access_keys: HashMap<String, (String, u64)>,
    orders: HashMap<String, Order>,
    broadcasts: usize,
    /// Parameter name the contract methods take the order under.
    order_param: Option<String>,
    /// Report view-call panics as `result.error` instead of a handler error.
    result_errors: bool,
}

/// Mock node state, shared with the test body.
#[derive(Default)]
pub struct MockNode {
    state: Mutex<NodeState>,
}

impl MockNode {
    pub fn add_access_key(&self, account_id: &str, public_key: &str) {
        self.state
            .lock()
            .unwrap()
            .access_keys
            .insert(account_id.to_string(), (public_key.to_string(), 0));
    }

    pub fn set_order_param(&self, name: &str) {
        self.state.lock().unwrap().order_param = Some(name.to_string());
    }

    pub fn use_result_errors(&self) {
        self.state.lock().unwrap().result_errors = true;
    }

    pub fn order(&self, order_id: &str) -> Option<Order> {
        self.state.lock().unwrap().orders.get(order_id).cloned()
    }

    pub fn order_count(&self) -> usize {
        self.state.lock().unwrap().orders.len()
    }

    pub fn broadcast_count(&self) -> usize {
        self.state.lock().unwrap().broadcasts
    }

    pub fn nonce(&self, account_id: &str) -> Option<u64> {
        self.state.lock().unwrap().access_keys.get(account_id).map(|(_, n)| *n)
    }
}

/// Start the mock node on an ephemeral port.
pub async fn start_mock_node() -> (SocketAddr, Arc<MockNode>) {
    let node = Arc::new(MockNode::default());
    let app = Router::new().route("/", post(rpc)).with_state(node.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, node)
}

/// Start an endpoint that answers every request with a proxy's 502 page.
pub async fn start_bad_gateway() -> SocketAddr {
    let app = Router::new().route(
        "/",
        post(|| async { (StatusCode::BAD_GATEWAY, "<html>502 Bad Gateway</html>") }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    addr
}

/// A mock node, a key store with the contract's key, an account file, and a
/// config pointing at all three.
pub struct TestEnv {
    pub dir: TempDir,
    pub config: ClientConfig,
    pub node: Arc<MockNode>,
    pub addr: SocketAddr,
}

pub async fn setup() -> TestEnv {
    let (addr, node) = start_mock_node().await;
    let dir = tempfile::tempdir().unwrap();

    let key_store = dir.path().join("credentials");
    write_credentials(&key_store, CONTRACT_ID, 7);
    node.add_access_key(CONTRACT_ID, &public_key(7));

    std::fs::create_dir_all(dir.path().join("neardev")).unwrap();
    std::fs::write(dir.path().join("neardev/dev-account"), CONTRACT_ID).unwrap();

    let mut config = ClientConfig::default();
    config.network.network_id = NETWORK_ID.to_string();
    config.network.node_url = format!("http://{}", addr);
    config.network.rpc_timeout_secs = 5;
    config.key_store.path = Some(key_store);

    TestEnv {
        dir,
        config,
        node,
        addr,
    }
}

async fn rpc(State(node): State<Arc<MockNode>>, Json(request): Json<Value>) -> Json<Value> {
    let id = request["id"].clone();
    let params = &request["params"];

    let response = match request["method"].as_str().unwrap_or_default() {
        "status" => Ok(json!({
            "chain_id": NETWORK_ID,
            "sync_info": {
                "latest_block_hash": bs58::encode(BLOCK_HASH).into_string(),
                "latest_block_height": 100,
            },
        })),
        "query" => match params["request_type"].as_str().unwrap_or_default() {
            "view_access_key" => view_access_key(&node, params),
            "call_function" => call_function(&node, params),
            other => Err(handler_error("UNKNOWN_REQUEST_TYPE", json!({ "request_type": other }))),
        },
        "broadcast_tx_commit" => broadcast(&node, params),
        other => Err(json!({
            "code": -32601,
            "message": "Method not found",
            "data": other,
        })),
    };

    Json(match response {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err(error) => json!({ "jsonrpc": "2.0", "id": id, "error": error }),
    })
}

fn handler_error(cause: &str, info: Value) -> Value {
    json!({
        "name": "HANDLER_ERROR",
        "cause": { "name": cause, "info": info },
        "code": -32000,
        "message": "Server error",
    })
}

fn view_access_key(node: &MockNode, params: &Value) -> Result<Value, Value> {
    let account_id = params["account_id"].as_str().unwrap_or_default();
    let public_key = params["public_key"].as_str().unwrap_or_default();

    let state = node.state.lock().unwrap();
    match state.access_keys.get(account_id) {
        Some((key, nonce)) if key == public_key => Ok(json!({
            "nonce": nonce,
            "permission": "FullAccess",
            "block_hash": bs58::encode(BLOCK_HASH).into_string(),
            "block_height": 100,
        })),
        _ => Err(handler_error("UNKNOWN_ACCESS_KEY", json!({ "public_key": public_key }))),
    }
}

fn call_function(node: &MockNode, params: &Value) -> Result<Value, Value> {
    let method = params["method_name"].as_str().unwrap_or_default();
    if params["account_id"] != CONTRACT_ID || method != "get_order" {
        return Err(handler_error(
            "CONTRACT_EXECUTION_ERROR",
            json!({ "vm_error": format!("MethodResolveError(MethodNotFound): {}", method) }),
        ));
    }

    let args = BASE64.decode(params["args_base64"].as_str().unwrap_or_default()).unwrap();
    let args: Value = serde_json::from_slice(&args).unwrap();
    let order_id = args["order_id"].as_str().unwrap_or_default();

    let state = node.state.lock().unwrap();
    match state.orders.get(order_id) {
        Some(order) => Ok(json!({
            "result": serde_json::to_vec(&order).unwrap(),
            "logs": [],
            "block_height": 100,
            "block_hash": bs58::encode(BLOCK_HASH).into_string(),
        })),
        None if state.result_errors => Ok(json!({
            "error": "wasm execution failed with error: FunctionCallError(HostError(GuestPanic { panic_msg: \"Order does not exist\" }))",
            "logs": [],
            "block_height": 100,
            "block_hash": bs58::encode(BLOCK_HASH).into_string(),
        })),
        None => Err(handler_error(
            "CONTRACT_EXECUTION_ERROR",
            json!({ "vm_error": "wasm execution failed with error: HostError(GuestPanic { panic_msg: \"Order does not exist\" })" }),
        )),
    }
}

fn broadcast(node: &MockNode, params: &Value) -> Result<Value, Value> {
    let encoded = params[0].as_str().unwrap_or_default();
    let bytes = BASE64.decode(encoded).unwrap();
    let signed: SignedTransaction = borsh::from_slice(&bytes).unwrap();
    let tx = &signed.transaction;
    let hash = tx.hash().unwrap();

    let mut state = node.state.lock().unwrap();
    state.broadcasts += 1;

    // Signature and nonce checks happen before execution.
    let PublicKey::Ed25519(key_bytes) = &tx.public_key;
    let Signature::Ed25519(sig_bytes) = &signed.signature;
    let verified = VerifyingKey::from_bytes(key_bytes)
        .map(|key| key.verify(&hash.0, &ed25519_dalek::Signature::from_bytes(sig_bytes)).is_ok())
        .unwrap_or(false);
    let nonce = match state.access_keys.get_mut(&tx.signer_id) {
        Some((key, nonce)) if *key == tx.public_key.to_string() && verified => nonce,
        _ => {
            return Err(handler_error(
                "INVALID_TRANSACTION",
                json!({ "InvalidTxError": "InvalidSignature" }),
            ))
        }
    };
    if tx.nonce <= *nonce {
        return Err(handler_error(
            "INVALID_TRANSACTION",
            json!({ "InvalidTxError": { "InvalidNonce": { "tx_nonce": tx.nonce, "ak_nonce": *nonce } } }),
        ));
    }
    *nonce = tx.nonce;

    let Action::FunctionCall(call) = &tx.actions[0];
    let order_param = state.order_param.clone().unwrap_or_else(|| "order".to_string());
    let result = execute(&mut state.orders, &order_param, &tx.signer_id, &tx.receiver_id, call.deposit, &call.method_name, &call.args);

    let status = match result {
        Ok(value) => json!({ "SuccessValue": BASE64.encode(value) }),
        Err(panic_msg) => json!({
            "Failure": {
                "ActionError": {
                    "index": 0,
                    "kind": { "FunctionCallError": { "ExecutionError": format!("Smart contract panicked: {}", panic_msg) } }
                }
            }
        }),
    };

    Ok(json!({
        "status": status,
        "transaction": { "hash": hash.to_base58(), "nonce": tx.nonce },
        "transaction_outcome": {
            "id": hash.to_base58(),
            "outcome": { "logs": [], "gas_burnt": 2_428_000_000_000u64 }
        },
        "receipts_outcome": [
            { "id": "receipt", "outcome": { "logs": [format!("{} called", call.method_name)], "gas_burnt": 3_000_000_000_000u64 } }
        ],
    }))
}

/// Order contract semantics: self-calls only, exactly one yoctoNEAR attached.
fn execute(
    orders: &mut HashMap<String, Order>,
    order_param: &str,
    signer_id: &str,
    receiver_id: &str,
    deposit: u128,
    method: &str,
    args: &[u8],
) -> Result<&'static [u8], String> {
    if signer_id != receiver_id || receiver_id != CONTRACT_ID {
        return Err("assertion failed: predecessor is not the contract".to_string());
    }
    if deposit != 1 {
        return Err("Requires attached deposit of exactly 1 yoctoNEAR".to_string());
    }

    let args: Value = serde_json::from_slice(args).map_err(|e| e.to_string())?;
    let order: Order = serde_json::from_value(args[order_param].clone())
        .map_err(|e| format!("Failed to deserialize input from JSON.: {}", e))?;

    match method {
        "create_order" => {
            if orders.contains_key(&order.order_id) {
                return Err("Order already exists".to_string());
            }
            orders.insert(order.order_id.clone(), order);
        }
        "update_order" => {
            let stored = orders
                .get_mut(&order.order_id)
                .ok_or_else(|| "Order does not exist".to_string())?;
            stored.description = order.description;
            stored.status = order.status;
        }
        other => return Err(format!("MethodNotFound: {}", other)),
    }

    Ok(b"\"OK\"")
}

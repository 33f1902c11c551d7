//! Blockchain JSON-RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoint
//! - Query chain state (node status, access keys, view calls)
//! - Broadcast signed transactions and wait for finality
//! - Handle timeouts and network errors gracefully

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{
    AccessKeyView, BlockchainError, BlockchainResult, CallFunctionResult, FinalExecutionOutcome,
    NodeStatus,
};
use crate::config::NetworkConfig;

/// JSON-RPC envelope returned by the node.
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    cause: Option<RpcErrorCause>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorCause {
    name: String,
    #[serde(default)]
    info: Option<Value>,
}

impl RpcErrorObject {
    fn into_error(self) -> BlockchainError {
        let data = match &self.data {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };

        match self.cause {
            Some(cause) if cause.name == "CONTRACT_EXECUTION_ERROR" => {
                let vm_error = cause
                    .info
                    .as_ref()
                    .and_then(|info| info.get("vm_error"))
                    .and_then(Value::as_str)
                    .map(str::to_string);
                BlockchainError::Execution(vm_error.unwrap_or(data))
            }
            Some(cause) => {
                let info = cause.info.map(|i| i.to_string()).unwrap_or_default();
                BlockchainError::Rpc(format!("{} {}", cause.name, info).trim_end().to_string())
            }
            None => {
                let name = self.name.unwrap_or_else(|| self.message.clone());
                BlockchainError::Rpc(format!("{}: {}", name, data).trim_end_matches(": ").to_string())
            }
        }
    }
}

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// HTTP client shared by all endpoints.
    http: reqwest::Client,
    /// List of endpoints (primary + failovers).
    endpoints: Vec<url::Url>,
    /// Configuration.
    config: NetworkConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client and verify the node is reachable.
    ///
    /// # Arguments
    /// * `config` - Ledger connection configuration
    ///
    /// # Returns
    /// A new client, or `BlockchainError::Connection` if no endpoint answers
    pub async fn new(config: NetworkConfig) -> BlockchainResult<Self> {
        let client = Self::without_probe(config)?;

        let status = client.status().await.map_err(|e| match e {
            e @ BlockchainError::Connection(_) => e,
            other => BlockchainError::Connection(other.to_string()),
        })?;

        // Verify chain ID matches configuration
        if status.chain_id != client.config.network_id {
            tracing::warn!(
                expected = %client.config.network_id,
                actual = %status.chain_id,
                "Connected node reports a different chain id"
            );
        }

        tracing::info!(
            node_url = %client.config.node_url,
            network_id = %client.config.network_id,
            latest_block = status.sync_info.latest_block_height,
            "Blockchain client initialized"
        );

        Ok(client)
    }

    /// Create a client without contacting the node.
    pub fn without_probe(config: NetworkConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut endpoints = Vec::new();

        // 1. Add primary endpoint
        let primary_url: url::Url = config.node_url.parse().map_err(|e| {
            BlockchainError::Connection(format!("Invalid RPC URL '{}': {}", config.node_url, e))
        })?;
        endpoints.push(primary_url);

        // 2. Add failover endpoints
        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                endpoints.push(url);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| BlockchainError::Connection(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoints,
            config,
            timeout_duration,
        })
    }

    /// Get the node status.
    pub async fn status(&self) -> BlockchainResult<NodeStatus> {
        self.request("status", json!([]), true).await
    }

    /// Get the access key of `account_id`, used for nonce and block hash.
    pub async fn view_access_key(
        &self,
        account_id: &str,
        public_key: &str,
    ) -> BlockchainResult<AccessKeyView> {
        self.query(json!({
            "request_type": "view_access_key",
            "finality": self.config.finality,
            "account_id": account_id,
            "public_key": public_key,
        }))
        .await
    }

    /// Run a read-only contract method.
    pub async fn call_function(
        &self,
        account_id: &str,
        method_name: &str,
        args: &[u8],
    ) -> BlockchainResult<CallFunctionResult> {
        self.query(json!({
            "request_type": "call_function",
            "finality": self.config.finality,
            "account_id": account_id,
            "method_name": method_name,
            "args_base64": BASE64.encode(args),
        }))
        .await
    }

    /// Broadcast a borsh-encoded signed transaction and wait until it is final.
    ///
    /// Sent to the primary endpoint only.
    pub async fn broadcast_tx_commit(
        &self,
        signed_transaction: &[u8],
    ) -> BlockchainResult<FinalExecutionOutcome> {
        self.request(
            "broadcast_tx_commit",
            json!([BASE64.encode(signed_transaction)]),
            false,
        )
        .await
    }

    /// Get the configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    async fn query<T: DeserializeOwned>(&self, params: Value) -> BlockchainResult<T> {
        let result: Value = self.request("query", params, true).await?;

        // Older nodes report query failures inside the result.
        if let Some(error) = result.get("error").and_then(Value::as_str) {
            return Err(BlockchainError::Execution(error.to_string()));
        }

        serde_json::from_value(result)
            .map_err(|e| BlockchainError::Serialization(format!("Unexpected query result: {}", e)))
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
        failover: bool,
    ) -> BlockchainResult<T> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": "dontcare",
            "method": method,
            "params": params,
        });

        let endpoints = if failover {
            &self.endpoints[..]
        } else {
            &self.endpoints[..1]
        };

        let mut last_error = String::from("no endpoints configured");
        for (i, endpoint) in endpoints.iter().enumerate() {
            let fut = async {
                let response = self.http.post(endpoint.clone()).json(&body).send().await?;
                let status = response.status();
                let text = response.text().await?;
                Ok::<_, reqwest::Error>((status, text))
            };

            let (status, text) = match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => result,
                Ok(Err(e)) => {
                    tracing::warn!(endpoint_idx = i, method, error = %e, "RPC error, trying next endpoint");
                    last_error = e.to_string();
                    continue;
                }
                Err(_) => {
                    tracing::warn!(endpoint_idx = i, method, "RPC timeout, trying next endpoint");
                    if !failover {
                        return Err(BlockchainError::Timeout(self.config.rpc_timeout_secs));
                    }
                    last_error = format!("timeout after {} seconds", self.config.rpc_timeout_secs);
                    continue;
                }
            };

            tracing::debug!(endpoint_idx = i, method, http_status = %status, "RPC response");

            // A JSON-RPC error object is final; anything else that is not a
            // successful envelope counts as an endpoint failure.
            let envelope = match serde_json::from_str::<RpcResponse>(&text) {
                Ok(RpcResponse { error: Some(error), .. }) => return Err(error.into_error()),
                Ok(envelope) if status.is_success() => envelope,
                _ => {
                    let error = format!("HTTP {} from {}: {}", status, endpoint, text);
                    if !failover {
                        return Err(BlockchainError::Rpc(error));
                    }
                    tracing::warn!(endpoint_idx = i, method, http_status = %status, "Bad RPC response, trying next endpoint");
                    last_error = error;
                    continue;
                }
            };

            let result = envelope
                .result
                .ok_or_else(|| BlockchainError::Rpc(format!("Empty response to {}", method)))?;

            return serde_json::from_value(result).map_err(|e| {
                BlockchainError::Serialization(format!("Unexpected {} response: {}", method, e))
            });
        }

        Err(BlockchainError::Connection(format!(
            "All RPC endpoints failed: {}",
            last_error
        )))
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("node_url", &self.config.node_url)
            .field("network_id", &self.config.network_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

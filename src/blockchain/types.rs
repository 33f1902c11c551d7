//! Chain-specific types and error definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// 32-byte hash (block hash, transaction hash).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CryptoHash(pub [u8; 32]);

impl CryptoHash {
    /// Parse a base58-encoded hash as returned by the RPC.
    pub fn from_base58(encoded: &str) -> BlockchainResult<Self> {
        let bytes = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| BlockchainError::Serialization(format!("Invalid base58 hash '{}': {}", encoded, e)))?;
        let hash: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            BlockchainError::Serialization(format!("Hash must be 32 bytes, got {}", b.len()))
        })?;
        Ok(Self(hash))
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl std::fmt::Display for CryptoHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_base58())
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// No endpoint could be reached.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The node answered with a JSON-RPC error.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The transaction or view call failed during contract execution.
    #[error("Execution failed: {0}")]
    Execution(String),

    /// Invalid key material or signing error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Encoding or decoding of a payload failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Method is not part of the contract binding.
    #[error("Method {method} is not a {kind} method of {contract}")]
    UnknownMethod {
        contract: String,
        method: String,
        kind: MethodKind,
    },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Whether a contract method mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Change,
    View,
}

impl std::fmt::Display for MethodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MethodKind::Change => f.write_str("change"),
            MethodKind::View => f.write_str("view"),
        }
    }
}

/// Node status as returned by the `status` method.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeStatus {
    pub chain_id: String,
    pub sync_info: SyncInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncInfo {
    pub latest_block_hash: String,
    pub latest_block_height: u64,
}

/// Access key view used to obtain the signing nonce.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessKeyView {
    pub nonce: u64,
    pub block_hash: String,
    #[serde(default)]
    pub block_height: u64,
}

/// Result of a read-only `call_function` query.
#[derive(Debug, Clone, Deserialize)]
pub struct CallFunctionResult {
    pub result: Vec<u8>,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub block_height: u64,
}

/// Final outcome of a broadcast transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct FinalExecutionOutcome {
    pub status: FinalExecutionStatus,
    pub transaction_outcome: ExecutionOutcomeWithId,
    #[serde(default)]
    pub receipts_outcome: Vec<ExecutionOutcomeWithId>,
}

/// Execution status of a transaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum FinalExecutionStatus {
    NotStarted,
    Started,
    Failure(Value),
    /// Base64-encoded return value.
    SuccessValue(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionOutcomeWithId {
    pub id: String,
    pub outcome: ExecutionOutcome,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionOutcome {
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub gas_burnt: u64,
}

/// Result of a finalized state-changing call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallOutcome {
    /// Transaction hash (base58).
    pub transaction_hash: String,
    /// Decoded JSON return value, `null` when the method returns nothing.
    pub value: Value,
    /// Logs emitted by the transaction and its receipts.
    pub logs: Vec<String>,
    /// Total gas burnt by the transaction and its receipts.
    pub gas_burnt: u64,
}

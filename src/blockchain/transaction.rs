//! Transaction building, signing, and finality.
//!
//! # Responsibilities
//! - Define the borsh wire layout of a function-call transaction
//! - Sync the signer nonce and reference block from chain
//! - Sign and broadcast transactions, waiting until final
//! - Decode the execution outcome into a `CallOutcome`

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use borsh::{BorshDeserialize, BorshSerialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::io::{Read, Write};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{
    BlockchainError, BlockchainResult, CallOutcome, CryptoHash, FinalExecutionOutcome,
    FinalExecutionStatus,
};
use crate::blockchain::wallet::Wallet;

/// Borsh tag of the function-call action.
const FUNCTION_CALL_TAG: u8 = 2;

/// Public key on the wire.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum PublicKey {
    Ed25519([u8; 32]),
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublicKey::Ed25519(bytes) => write!(f, "ed25519:{}", bs58::encode(bytes).into_string()),
        }
    }
}

/// Signature on the wire.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum Signature {
    Ed25519([u8; 64]),
}

/// Call a contract method.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct FunctionCallAction {
    pub method_name: String,
    pub args: Vec<u8>,
    pub gas: u64,
    pub deposit: u128,
}

/// Transaction action. Only function calls are issued by this client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FunctionCall(FunctionCallAction),
}

impl BorshSerialize for Action {
    fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            Action::FunctionCall(call) => {
                FUNCTION_CALL_TAG.serialize(writer)?;
                call.serialize(writer)
            }
        }
    }
}

impl BorshDeserialize for Action {
    fn deserialize_reader<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        match u8::deserialize_reader(reader)? {
            FUNCTION_CALL_TAG => Ok(Action::FunctionCall(FunctionCallAction::deserialize_reader(reader)?)),
            tag => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("unsupported action tag {}", tag),
            )),
        }
    }
}

/// Unsigned transaction.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Transaction {
    pub signer_id: String,
    pub public_key: PublicKey,
    pub nonce: u64,
    pub receiver_id: String,
    pub block_hash: [u8; 32],
    pub actions: Vec<Action>,
}

impl Transaction {
    /// sha256 of the borsh encoding; the transaction id.
    pub fn hash(&self) -> BlockchainResult<CryptoHash> {
        let bytes = borsh::to_vec(self)
            .map_err(|e| BlockchainError::Serialization(format!("Cannot encode transaction: {}", e)))?;
        Ok(CryptoHash(Sha256::digest(&bytes).into()))
    }
}

/// Transaction with the signer's signature over its hash.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signature: Signature,
}

/// Transaction builder for function calls.
pub struct TxBuilder {
    client: BlockchainClient,
    wallet: Wallet,
}

impl TxBuilder {
    /// Create a new transaction builder.
    pub fn new(client: BlockchainClient, wallet: Wallet) -> Self {
        Self { client, wallet }
    }

    /// Build a transaction against the latest access key state.
    ///
    /// # Arguments
    /// * `receiver_id` - Account the actions are executed on
    /// * `actions` - Actions to execute
    pub async fn build(&self, receiver_id: &str, actions: Vec<Action>) -> BlockchainResult<Transaction> {
        let public_key = self.wallet.public_key();

        // Get current nonce from chain and sync wallet
        let access_key = self
            .client
            .view_access_key(self.wallet.account_id(), &public_key.to_string())
            .await?;
        self.wallet.set_nonce(access_key.nonce + 1);

        let block_hash = CryptoHash::from_base58(&access_key.block_hash)?;
        let nonce = self.wallet.get_and_increment_nonce();

        Ok(Transaction {
            signer_id: self.wallet.account_id().to_string(),
            public_key,
            nonce,
            receiver_id: receiver_id.to_string(),
            block_hash: block_hash.0,
            actions,
        })
    }

    /// Sign a transaction with the wallet key.
    pub fn sign(&self, transaction: Transaction) -> BlockchainResult<(CryptoHash, SignedTransaction)> {
        let hash = transaction.hash()?;
        let signature = self.wallet.sign(&hash.0);
        Ok((hash, SignedTransaction { transaction, signature }))
    }

    /// Build, sign, and broadcast a transaction, then wait until it is final.
    pub async fn send(&self, receiver_id: &str, actions: Vec<Action>) -> BlockchainResult<CallOutcome> {
        let transaction = self.build(receiver_id, actions).await?;
        let nonce = transaction.nonce;
        let (hash, signed) = self.sign(transaction)?;

        let bytes = borsh::to_vec(&signed)
            .map_err(|e| BlockchainError::Serialization(format!("Cannot encode transaction: {}", e)))?;

        tracing::debug!(tx_hash = %hash, nonce, receiver_id, "Broadcasting transaction");

        let outcome = self.client.broadcast_tx_commit(&bytes).await?;
        decode_outcome(outcome)
    }

    /// Get the signing wallet.
    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }
}

/// Turn a final execution outcome into a call result, or the failure it reports.
pub fn decode_outcome(outcome: FinalExecutionOutcome) -> BlockchainResult<CallOutcome> {
    let tx_hash = outcome.transaction_outcome.id.clone();

    let encoded = match outcome.status {
        FinalExecutionStatus::SuccessValue(encoded) => encoded,
        FinalExecutionStatus::Failure(failure) => {
            return Err(BlockchainError::Execution(describe_failure(&failure)));
        }
        FinalExecutionStatus::NotStarted | FinalExecutionStatus::Started => {
            return Err(BlockchainError::Execution(format!(
                "Transaction {} did not finish executing",
                tx_hash
            )));
        }
    };

    let raw = BASE64
        .decode(encoded.as_bytes())
        .map_err(|e| BlockchainError::Serialization(format!("Invalid SuccessValue: {}", e)))?;
    let value = if raw.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&raw).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&raw).into_owned()))
    };

    let mut logs = outcome.transaction_outcome.outcome.logs;
    let mut gas_burnt = outcome.transaction_outcome.outcome.gas_burnt;
    for receipt in outcome.receipts_outcome {
        logs.extend(receipt.outcome.logs);
        gas_burnt = gas_burnt.saturating_add(receipt.outcome.gas_burnt);
    }

    Ok(CallOutcome {
        transaction_hash: tx_hash,
        value,
        logs,
        gas_burnt,
    })
}

/// Pull the innermost error message out of a `Failure` status.
fn describe_failure(failure: &Value) -> String {
    fn innermost(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => {
                for key in ["ExecutionError", "FunctionCallError", "kind", "ActionError"] {
                    if let Some(found) = map.get(key).and_then(innermost) {
                        return Some(found);
                    }
                }
                None
            }
            _ => None,
        }
    }

    innermost(failure).unwrap_or_else(|| failure.to_string())
}

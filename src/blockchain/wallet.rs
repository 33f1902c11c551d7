//! Wallet management and transaction signing.
//!
//! # Security
//! - Keys are loaded from the unencrypted file-system key store
//! - Keys are never logged or serialized

use ed25519_dalek::{Signer, SigningKey};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::blockchain::transaction::{PublicKey, Signature};
use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Prefix of ed25519 keys in their textual form.
pub const ED25519_PREFIX: &str = "ed25519:";

/// On-disk key file layout.
#[derive(Deserialize)]
struct KeyFile {
    #[serde(default)]
    account_id: Option<String>,
    public_key: String,
    #[serde(alias = "secret_key")]
    private_key: String,
}

/// Wallet for transaction signing with nonce management.
#[derive(Clone)]
pub struct Wallet {
    /// Account that signs transactions.
    account_id: String,
    /// The underlying signing key.
    signing_key: SigningKey,
    /// Next nonce for sequential transactions.
    nonce: Arc<AtomicU64>,
}

impl Wallet {
    /// Create a wallet from an `ed25519:<base58>` secret key.
    ///
    /// Accepts either a 64-byte keypair or a 32-byte seed.
    pub fn from_secret_key(account_id: &str, secret_key: &str) -> BlockchainResult<Self> {
        let encoded = secret_key.strip_prefix(ED25519_PREFIX).unwrap_or(secret_key);

        let bytes = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        let signing_key = match bytes.len() {
            64 => {
                let mut keypair = [0u8; 64];
                keypair.copy_from_slice(&bytes);
                SigningKey::from_keypair_bytes(&keypair)
                    .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?
            }
            32 => {
                let mut seed = [0u8; 32];
                seed.copy_from_slice(&bytes);
                SigningKey::from_bytes(&seed)
            }
            len => {
                return Err(BlockchainError::Wallet(format!(
                    "Invalid private key format: expected 32 or 64 bytes, got {}",
                    len
                )))
            }
        };

        let wallet = Self {
            account_id: account_id.to_string(),
            signing_key,
            nonce: Arc::new(AtomicU64::new(0)),
        };

        tracing::info!(
            account_id = %wallet.account_id,
            public_key = %wallet.public_key(),
            "Wallet initialized"
        );

        Ok(wallet)
    }

    /// Path of an account's key file inside a key store.
    pub fn key_file_path(key_store: &Path, network_id: &str, account_id: &str) -> PathBuf {
        key_store.join(network_id).join(format!("{}.json", account_id))
    }

    /// Load the key of `account_id` from `<key_store>/<network_id>/<account_id>.json`.
    pub fn from_key_store(key_store: &Path, network_id: &str, account_id: &str) -> BlockchainResult<Self> {
        let path = Self::key_file_path(key_store, network_id, account_id);

        let content = std::fs::read_to_string(&path).map_err(|e| {
            BlockchainError::Wallet(format!("Cannot read key file {}: {}", path.display(), e))
        })?;
        let key_file: KeyFile = serde_json::from_str(&content).map_err(|e| {
            BlockchainError::Wallet(format!("Malformed key file {}: {}", path.display(), e))
        })?;

        if let Some(file_account) = &key_file.account_id {
            if file_account != account_id {
                return Err(BlockchainError::Wallet(format!(
                    "Key file {} belongs to {}, not {}",
                    path.display(),
                    file_account,
                    account_id
                )));
            }
        }

        let wallet = Self::from_secret_key(account_id, &key_file.private_key)?;
        if wallet.public_key().to_string() != key_file.public_key {
            return Err(BlockchainError::Wallet(format!(
                "Public key in {} does not match its private key",
                path.display()
            )));
        }

        Ok(wallet)
    }

    /// Get the signing account id.
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Get the wallet's public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::Ed25519(self.signing_key.verifying_key().to_bytes())
    }

    /// Get and increment the nonce atomically.
    pub fn get_and_increment_nonce(&self) -> u64 {
        self.nonce.fetch_add(1, Ordering::SeqCst)
    }

    /// Set the nonce to a specific value (e.g., after querying from chain).
    pub fn set_nonce(&self, nonce: u64) {
        self.nonce.store(nonce, Ordering::SeqCst);
    }

    /// Get current nonce without incrementing.
    pub fn current_nonce(&self) -> u64 {
        self.nonce.load(Ordering::SeqCst)
    }

    /// Sign a message (a transaction hash).
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature::Ed25519(self.signing_key.sign(message).to_bytes())
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("account_id", &self.account_id)
            .field("public_key", &self.public_key().to_string())
            .finish()
    }
}

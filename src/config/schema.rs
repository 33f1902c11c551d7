//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the order client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the order client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Ledger connection settings (network id and endpoints).
    pub network: NetworkConfig,

    /// Credential store location.
    pub key_store: KeyStoreConfig,

    /// Remote contract binding and call budget.
    pub contract: ContractConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Ledger connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Network identifier (e.g., "testnet", "mainnet").
    pub network_id: String,

    /// JSON-RPC endpoint URL.
    pub node_url: String,

    /// Failover JSON-RPC endpoint URLs, used for read-only requests only.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Wallet web application URL.
    pub wallet_url: String,

    /// Helper service URL.
    pub helper_url: String,

    /// Block explorer URL.
    pub explorer_url: String,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Finality used for queries ("optimistic", "near-final" or "final").
    pub finality: String,
}

impl NetworkConfig {
    /// Explorer link for a transaction hash.
    pub fn explorer_tx_url(&self, tx_hash: &str) -> String {
        format!("{}/transactions/{}", self.explorer_url.trim_end_matches('/'), tx_hash)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            network_id: "testnet".to_string(),
            node_url: "https://rpc.testnet.near.org".to_string(),
            failover_urls: Vec::new(),
            wallet_url: "https://wallet.testnet.near.org".to_string(),
            helper_url: "https://helper.testnet.near.org".to_string(),
            explorer_url: "https://explorer.testnet.near.org".to_string(),
            rpc_timeout_secs: 60,
            finality: "final".to_string(),
        }
    }
}

/// Unencrypted file-system key store.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct KeyStoreConfig {
    /// Key store root. Defaults to `$HOME/.near-credentials`.
    pub path: Option<PathBuf>,
}

impl KeyStoreConfig {
    /// Resolve the key store root directory.
    pub fn resolve(&self) -> Option<PathBuf> {
        match &self.path {
            Some(path) => Some(path.clone()),
            None => std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".near-credentials")),
        }
    }
}

/// Remote contract binding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Contract account id. When unset, read from `account_file`.
    pub account_id: Option<String>,

    /// File holding the contract account id, relative to the config file.
    pub account_file: PathBuf,

    /// Account that signs transactions (defaults to the contract account).
    pub signer_id: Option<String>,

    /// Methods invoked as signed, state-changing transactions.
    pub change_methods: Vec<String>,

    /// Methods invoked as read-only queries.
    pub view_methods: Vec<String>,

    /// Gas ceiling attached to each state-changing call.
    pub gas: u64,

    /// Deposit in yoctoNEAR attached to each state-changing call.
    pub deposit: String,

    /// Argument name the order is passed under.
    pub order_arg: String,
}

impl ContractConfig {
    /// Parse the deposit as yoctoNEAR.
    pub fn deposit_yocto(&self) -> Result<u128, std::num::ParseIntError> {
        self.deposit.trim().parse()
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            account_file: PathBuf::from("neardev/dev-account"),
            signer_id: None,
            change_methods: vec!["create_order".to_string(), "update_order".to_string()],
            view_methods: vec!["get_order".to_string()],
            gas: 300_000_000_000_000, // 300 Tgas
            deposit: "1".to_string(),
            order_arg: "order".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Key store file (signer credentials)
//!     → wallet.rs (key loading, signing)
//!     → client.rs (JSON-RPC connection with timeouts)
//!     → transaction.rs (build, sign, broadcast, wait for finality)
//!     → contract.rs (change/view method binding)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - State-changing calls are never retried or failed over

pub mod client;
pub mod contract;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use contract::{Contract, ContractMethods};
pub use types::{BlockchainError, BlockchainResult, CallOutcome};
pub use wallet::Wallet;

//! Order record, call budget, and errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::blockchain::types::{BlockchainError, CallOutcome};
use crate::config::ConfigError;

/// Order status label. Transition rules are owned by the remote contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(OrderStatus::Pending),
            "Scheduled" => Ok(OrderStatus::Scheduled),
            "InProgress" => Ok(OrderStatus::InProgress),
            "Completed" => Ok(OrderStatus::Completed),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

/// Order record as stored by the remote contract.
///
/// Values are never mutated in place; updates are expressed as new values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub description: String,
    pub status: OrderStatus,
}

impl Order {
    /// Create an order with a freshly generated id.
    pub fn new(description: impl Into<String>, status: OrderStatus) -> Self {
        Self {
            order_id: Uuid::new_v4().to_string(),
            description: description.into(),
            status,
        }
    }

    /// Copy of this order with a different description.
    pub fn with_description(&self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self.clone()
        }
    }

    /// Copy of this order with a different status.
    pub fn with_status(&self, status: OrderStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

/// Resources attached to each state-changing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallBudget {
    /// Gas ceiling.
    pub gas: u64,
    /// Deposit in yoctoNEAR.
    pub deposit: u128,
}

/// Results of the create / read / update / read sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifecycleReport {
    pub created: CallOutcome,
    pub fetched: Order,
    pub updated: CallOutcome,
    pub refetched: Order,
}

/// Errors surfaced by the order client.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Account-name file, credentials, or config file could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The ledger endpoint could not be reached.
    #[error("Cannot reach ledger: {0}")]
    Connection(#[source] BlockchainError),

    /// The remote contract call failed.
    #[error("Remote call {method} failed: {source}")]
    RemoteCall {
        method: String,
        #[source]
        source: BlockchainError,
    },
}

impl OrderError {
    pub fn remote(method: &str, source: BlockchainError) -> Self {
        OrderError::RemoteCall {
            method: method.to_string(),
            source,
        }
    }
}

/// Result type for order operations.
pub type OrderResult<T> = Result<T, OrderError>;

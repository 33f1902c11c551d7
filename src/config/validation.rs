//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate endpoint URLs and value ranges (timeouts > 0, gas within limit)
//! - Check that change and view methods do not overlap
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::ClientConfig;

/// Maximum gas a single transaction may prepay.
pub const MAX_PREPAID_GAS: u64 = 300_000_000_000_000;

const FINALITIES: [&str; 3] = ["optimistic", "near-final", "final"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("network.network_id must not be empty")]
    EmptyNetworkId,

    #[error("{field} is not a valid URL: {value}")]
    InvalidUrl { field: String, value: String },

    #[error("network.rpc_timeout_secs must be greater than 0")]
    ZeroTimeout,

    #[error("network.finality must be one of optimistic, near-final, final (got {0})")]
    InvalidFinality(String),

    #[error("contract.gas must be between 1 and {max} (got {value})")]
    GasOutOfRange { value: u64, max: u64 },

    #[error("contract.deposit is not a yoctoNEAR amount: {0}")]
    InvalidDeposit(String),

    #[error("method {0} is listed as both change and view method")]
    MethodOverlap(String),

    #[error("contract.order_arg must not be empty")]
    EmptyOrderArg,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let network = &config.network;

    if network.network_id.trim().is_empty() {
        errors.push(ValidationError::EmptyNetworkId);
    }

    let mut urls = vec![
        ("network.node_url".to_string(), &network.node_url),
        ("network.wallet_url".to_string(), &network.wallet_url),
        ("network.helper_url".to_string(), &network.helper_url),
        ("network.explorer_url".to_string(), &network.explorer_url),
    ];
    for (i, failover) in network.failover_urls.iter().enumerate() {
        urls.push((format!("network.failover_urls[{}]", i), failover));
    }
    for (field, value) in urls {
        if url::Url::parse(value).is_err() {
            errors.push(ValidationError::InvalidUrl {
                field,
                value: value.clone(),
            });
        }
    }

    if network.rpc_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if !FINALITIES.contains(&network.finality.as_str()) {
        errors.push(ValidationError::InvalidFinality(network.finality.clone()));
    }

    let contract = &config.contract;
    if contract.gas == 0 || contract.gas > MAX_PREPAID_GAS {
        errors.push(ValidationError::GasOutOfRange {
            value: contract.gas,
            max: MAX_PREPAID_GAS,
        });
    }

    if contract.deposit_yocto().is_err() {
        errors.push(ValidationError::InvalidDeposit(contract.deposit.clone()));
    }

    for method in &contract.change_methods {
        if contract.view_methods.contains(method) {
            errors.push(ValidationError::MethodOverlap(method.clone()));
        }
    }

    if contract.order_arg.trim().is_empty() {
        errors.push(ValidationError::EmptyOrderArg);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve the contract account and signer credentials
//! - Establish the ledger connection
//! - Bind the contract and build the order client
//! - Drive the default create → read → update → read sequence
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Steps run in order, not concurrently

use std::path::Path;

use crate::blockchain::{BlockchainClient, Contract, ContractMethods, Wallet};
use crate::config::validation::ValidationError;
use crate::config::{read_account_id, ClientConfig, ConfigError};
use crate::orders::{CallBudget, LifecycleReport, Order, OrderClient, OrderError, OrderResult, OrderStatus};

/// Description of the order created by [`run`].
pub const INITIAL_DESCRIPTION: &str = "Description";

/// Description the order is updated to by [`run`].
pub const UPDATED_DESCRIPTION: &str = "Changed";

/// Connect to the ledger and bind the order contract.
///
/// # Arguments
/// * `config` - Validated client configuration
/// * `base_dir` - Directory relative account-file paths are resolved against
pub async fn connect(config: &ClientConfig, base_dir: &Path) -> OrderResult<OrderClient> {
    let contract_id = match &config.contract.account_id {
        Some(account_id) => account_id.clone(),
        None => read_account_id(base_dir, &config.contract.account_file)?,
    };
    let signer_id = config.contract.signer_id.clone().unwrap_or_else(|| contract_id.clone());

    let key_store = config
        .key_store
        .resolve()
        .ok_or_else(|| ConfigError::Credentials("key store path not set and HOME is undefined".to_string()))?;
    let wallet = Wallet::from_key_store(&key_store, &config.network.network_id, &signer_id)
        .map_err(|e| ConfigError::Credentials(e.to_string()))?;

    let deposit = config
        .contract
        .deposit_yocto()
        .map_err(|_| ConfigError::Validation(vec![ValidationError::InvalidDeposit(config.contract.deposit.clone())]))?;

    let client = BlockchainClient::new(config.network.clone())
        .await
        .map_err(OrderError::Connection)?;

    let methods = ContractMethods::new(
        config.contract.change_methods.iter().cloned(),
        config.contract.view_methods.iter().cloned(),
    );
    let contract = Contract::new(client, wallet, &contract_id, methods);

    let budget = CallBudget {
        gas: config.contract.gas,
        deposit,
    };

    Ok(OrderClient::new(contract, budget, config.contract.order_arg.clone()))
}

/// Connect, then create a fresh order, read it, update it, and read it again.
pub async fn run(config: &ClientConfig, base_dir: &Path) -> OrderResult<LifecycleReport> {
    let client = connect(config, base_dir).await?;
    let order = Order::new(INITIAL_DESCRIPTION, OrderStatus::Pending);

    tracing::info!(
        contract = client.contract().account_id(),
        order_id = %order.order_id,
        "Starting order lifecycle"
    );

    client.run(order, UPDATED_DESCRIPTION).await
}

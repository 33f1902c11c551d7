//! Order lifecycle client.
//!
//! # Responsibilities
//! - Submit `create_order` and `update_order` as budgeted transactions
//! - Fetch orders with the read-only `get_order` query
//! - Run the create → read → update → read sequence, logging each step
//!
//! # Design Decisions
//! - Constructed once and passed to call sites; no module-level state
//! - Steps run strictly in order; the first failure aborts the sequence
//! - Remote failures are surfaced as-is, never retried

use serde_json::json;

use crate::blockchain::types::CallOutcome;
use crate::blockchain::Contract;
use crate::orders::types::{CallBudget, LifecycleReport, Order, OrderError, OrderResult};

pub const CREATE_ORDER: &str = "create_order";
pub const GET_ORDER: &str = "get_order";
pub const UPDATE_ORDER: &str = "update_order";

/// Client for the order contract.
#[derive(Debug)]
pub struct OrderClient {
    contract: Contract,
    budget: CallBudget,
    order_arg: String,
}

impl OrderClient {
    /// Create a client over a bound contract.
    ///
    /// # Arguments
    /// * `contract` - Binding with `create_order`/`update_order` as change methods and `get_order` as view method
    /// * `budget` - Gas and deposit attached to each state-changing call
    /// * `order_arg` - Argument name the order is passed under
    pub fn new(contract: Contract, budget: CallBudget, order_arg: impl Into<String>) -> Self {
        Self {
            contract,
            budget,
            order_arg: order_arg.into(),
        }
    }

    /// Get the bound contract.
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Create `order` on the remote contract and wait for finality.
    pub async fn submit_create(&self, order: &Order) -> OrderResult<CallOutcome> {
        self.submit(CREATE_ORDER, order).await
    }

    /// Fetch an order by id.
    pub async fn fetch(&self, order_id: &str) -> OrderResult<Order> {
        self.contract
            .view(GET_ORDER, &json!({ "order_id": order_id }))
            .await
            .map_err(|e| OrderError::remote(GET_ORDER, e))
    }

    /// Replace the stored order carrying the same id with `order`.
    pub async fn submit_update(&self, order: &Order) -> OrderResult<CallOutcome> {
        self.submit(UPDATE_ORDER, order).await
    }

    /// Create `order`, read it back, update its description, and read it again.
    pub async fn run(&self, order: Order, updated_description: &str) -> OrderResult<LifecycleReport> {
        let created = self.submit_create(&order).await?;
        tracing::info!(order_id = %order.order_id, value = %created.value, "Order created");

        let fetched = self.fetch(&order.order_id).await?;
        tracing::info!(order = ?fetched, "Order fetched");

        let changed = order.with_description(updated_description);
        let updated = self.submit_update(&changed).await?;
        tracing::info!(order_id = %changed.order_id, value = %updated.value, "Order updated");

        let refetched = self.fetch(&order.order_id).await?;
        tracing::info!(order = ?refetched, "Order fetched after update");

        Ok(LifecycleReport {
            created,
            fetched,
            updated,
            refetched,
        })
    }

    async fn submit(&self, method: &str, order: &Order) -> OrderResult<CallOutcome> {
        let mut args = serde_json::Map::new();
        args.insert(self.order_arg.clone(), json!(order));

        let outcome = self
            .contract
            .call(method, &args, self.budget.gas, self.budget.deposit)
            .await
            .map_err(|e| OrderError::remote(method, e))?;

        tracing::debug!(
            method,
            order_id = %order.order_id,
            tx_hash = %outcome.transaction_hash,
            gas_burnt = outcome.gas_burnt,
            explorer = %self.contract.client().config().explorer_tx_url(&outcome.transaction_hash),
            "Transaction final"
        );

        Ok(outcome)
    }
}

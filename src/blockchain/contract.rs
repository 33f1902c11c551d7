//! Binding to one deployed contract.
//!
//! Methods are split into change methods, sent as signed transactions with a
//! gas and deposit budget, and view methods, sent as read-only queries.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::transaction::{Action, FunctionCallAction, TxBuilder};
use crate::blockchain::types::{BlockchainError, BlockchainResult, CallOutcome, MethodKind};
use crate::blockchain::wallet::Wallet;

/// Change/view split of a contract's methods.
#[derive(Debug, Clone, Default)]
pub struct ContractMethods {
    pub change: HashSet<String>,
    pub view: HashSet<String>,
}

impl ContractMethods {
    pub fn new<C, V>(change: C, view: V) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        Self {
            change: change.into_iter().map(Into::into).collect(),
            view: view.into_iter().map(Into::into).collect(),
        }
    }
}

/// Local handle whose methods map 1:1 to remote contract entry points.
pub struct Contract {
    account_id: String,
    methods: ContractMethods,
    client: BlockchainClient,
    tx: TxBuilder,
}

impl Contract {
    /// Bind to the contract deployed at `account_id`, signing with `wallet`.
    pub fn new(client: BlockchainClient, wallet: Wallet, account_id: &str, methods: ContractMethods) -> Self {
        tracing::info!(
            contract = account_id,
            signer = wallet.account_id(),
            change_methods = ?methods.change,
            view_methods = ?methods.view,
            "Contract bound"
        );

        Self {
            account_id: account_id.to_string(),
            methods,
            tx: TxBuilder::new(client.clone(), wallet),
            client,
        }
    }

    /// Contract account id.
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Underlying RPC client.
    pub fn client(&self) -> &BlockchainClient {
        &self.client
    }

    /// Invoke a change method and wait until the transaction is final.
    pub async fn call<A: Serialize>(
        &self,
        method: &str,
        args: &A,
        gas: u64,
        deposit: u128,
    ) -> BlockchainResult<CallOutcome> {
        self.check_method(method, MethodKind::Change)?;

        let args = serde_json::to_vec(args)
            .map_err(|e| BlockchainError::Serialization(format!("Cannot encode {} args: {}", method, e)))?;

        let action = Action::FunctionCall(FunctionCallAction {
            method_name: method.to_string(),
            args,
            gas,
            deposit,
        });

        self.tx.send(&self.account_id, vec![action]).await
    }

    /// Invoke a view method and decode its JSON result.
    pub async fn view<A: Serialize, T: DeserializeOwned>(&self, method: &str, args: &A) -> BlockchainResult<T> {
        self.check_method(method, MethodKind::View)?;

        let args = serde_json::to_vec(args)
            .map_err(|e| BlockchainError::Serialization(format!("Cannot encode {} args: {}", method, e)))?;

        let result = self.client.call_function(&self.account_id, method, &args).await?;
        for log in &result.logs {
            tracing::debug!(contract = %self.account_id, method, log = %log, "View log");
        }

        serde_json::from_slice(&result.result)
            .map_err(|e| BlockchainError::Serialization(format!("Unexpected {} result: {}", method, e)))
    }

    fn check_method(&self, method: &str, kind: MethodKind) -> BlockchainResult<()> {
        let known = match kind {
            MethodKind::Change => &self.methods.change,
            MethodKind::View => &self.methods.view,
        };
        if known.contains(method) {
            Ok(())
        } else {
            Err(BlockchainError::UnknownMethod {
                contract: self.account_id.clone(),
                method: method.to_string(),
                kind,
            })
        }
    }
}

impl std::fmt::Debug for Contract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contract")
            .field("account_id", &self.account_id)
            .field("methods", &self.methods)
            .field("signer", self.tx.wallet())
            .finish()
    }
}

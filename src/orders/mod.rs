//! Order records and the client that drives them through the remote contract.

pub mod client;
pub mod types;

pub use client::OrderClient;
pub use types::{CallBudget, LifecycleReport, Order, OrderError, OrderResult, OrderStatus};

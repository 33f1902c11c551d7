//! Order Contract Client Library

pub mod blockchain;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod orders;

pub use config::schema::ClientConfig;
pub use orders::{Order, OrderClient, OrderError, OrderStatus};

//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!
//! contract account-name file
//!     → loader.rs (read_account_id)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs (defaults target testnet)
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, read_account_id, ConfigError};
pub use schema::ClientConfig;
pub use schema::ContractConfig;
pub use schema::KeyStoreConfig;
pub use schema::NetworkConfig;

//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Read contract account → Load signer key
//!     → Connect to ledger → Bind contract → OrderClient
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then credentials, then network
//! - Credentials are checked before any network traffic

pub mod startup;

pub use startup::{connect, run};

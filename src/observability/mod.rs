//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing macros (structured log events)
//!
//! Consumers:
//!     → logging.rs subscriber (stderr, filtered by level)
//! ```
//!
//! # Design Decisions
//! - Structured fields (order_id, tx_hash, method) instead of formatted text
//! - `RUST_LOG` overrides the configured level

pub mod logging;

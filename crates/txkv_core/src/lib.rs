//! # TxKV Core
//!
//! Transactional in-memory key-value store.
//!
//! This crate provides:
//! - [`TransactionalStore`]: a committed map plus a single transaction overlay
//!   with begin/put/get/commit/rollback and read-your-own-writes
//! - [`SharedStore`]: a cloneable handle that serializes every operation
//!   behind one lock for use from several threads
//! - Operation counters ([`StoreStats`])

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod shared;
mod stats;
mod store;
mod transaction;
mod types;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use shared::SharedStore;
pub use stats::{StatsSnapshot, StoreStats};
pub use store::TransactionalStore;
pub use transaction::Transaction;
pub use types::{StoreState, TransactionId};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

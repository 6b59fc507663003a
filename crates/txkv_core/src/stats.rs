//! Store statistics.
//!
//! Counters are updated by the store as operations are accepted or
//! rejected, and can be read at any time through [`StoreStats`] or captured
//! all at once with [`StoreStats::snapshot`].
//!
//! # Usage
//!
//! ```rust
//! use txkv_core::TransactionalStore;
//!
//! let mut store: TransactionalStore<&str, i32> = TransactionalStore::new();
//! store.begin().unwrap();
//! store.put("A", 1).unwrap();
//! store.commit().unwrap();
//!
//! let stats = store.stats().snapshot();
//! assert_eq!(stats.writes, 1);
//! assert_eq!(stats.transactions_committed, 1);
//! ```

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Store statistics.
///
/// All counters are atomic so that `get`, which only borrows the store,
/// can still record reads. Values only ever increase.
#[derive(Debug, Default)]
pub struct StoreStats {
    /// Total number of `get` calls.
    reads: AtomicU64,
    /// Total number of accepted `put` calls.
    writes: AtomicU64,

    // Transaction counters
    /// Total number of transactions started.
    transactions_started: AtomicU64,
    /// Total number of transactions committed.
    transactions_committed: AtomicU64,
    /// Total number of transactions rolled back.
    transactions_rolled_back: AtomicU64,
    /// Total number of overlay entries merged into the base.
    keys_committed: AtomicU64,

    /// Total number of operations refused with a `StoreError`.
    rejected: AtomicU64,
}

impl StoreStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_transaction_start(&self) {
        self.transactions_started.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_transaction_commit(&self, keys: u64) {
        self.transactions_committed.fetch_add(1, Ordering::Relaxed);
        self.keys_committed.fetch_add(keys, Ordering::Relaxed);
    }

    pub(crate) fn record_transaction_rollback(&self) {
        self.transactions_rolled_back.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the total number of read operations.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Returns the total number of accepted writes.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Returns the total number of transactions started.
    pub fn transactions_started(&self) -> u64 {
        self.transactions_started.load(Ordering::Relaxed)
    }

    /// Returns the total number of transactions committed.
    pub fn transactions_committed(&self) -> u64 {
        self.transactions_committed.load(Ordering::Relaxed)
    }

    /// Returns the total number of transactions rolled back.
    pub fn transactions_rolled_back(&self) -> u64 {
        self.transactions_rolled_back.load(Ordering::Relaxed)
    }

    /// Returns the total number of keys merged into the base by commits.
    pub fn keys_committed(&self) -> u64 {
        self.keys_committed.load(Ordering::Relaxed)
    }

    /// Returns the total number of rejected operations.
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of all stats.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            reads: self.reads(),
            writes: self.writes(),
            transactions_started: self.transactions_started(),
            transactions_committed: self.transactions_committed(),
            transactions_rolled_back: self.transactions_rolled_back(),
            keys_committed: self.keys_committed(),
            rejected: self.rejected(),
        }
    }
}

/// A point-in-time snapshot of store statistics.
///
/// Unlike `StoreStats`, this is a plain struct that can be serialized,
/// compared, or passed across threads without atomics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StatsSnapshot {
    /// Total number of read operations.
    pub reads: u64,
    /// Total number of accepted writes.
    pub writes: u64,
    /// Total number of transactions started.
    pub transactions_started: u64,
    /// Total number of transactions committed.
    pub transactions_committed: u64,
    /// Total number of transactions rolled back.
    pub transactions_rolled_back: u64,
    /// Total number of keys merged into the base.
    pub keys_committed: u64,
    /// Total number of rejected operations.
    pub rejected: u64,
}

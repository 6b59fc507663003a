//! Transactional key-value store.

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::stats::StoreStats;
use crate::transaction::Transaction;
use crate::types::{StoreState, TransactionId};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::{debug, trace};

/// An in-memory key-value store with a single transaction overlay.
///
/// The store owns a committed map and, while a transaction is open, an
/// overlay of pending writes:
/// - `put` only succeeds inside a transaction and writes to the overlay
/// - `get` sees the overlay first (read-your-own-writes), then the committed map
/// - `commit` merges the overlay into the committed map
/// - `rollback` discards the overlay
///
/// ## Single Transaction
///
/// At most one transaction is open at a time. `begin` while one is open
/// fails with [`StoreError::TransactionAlreadyActive`]; there is no nesting.
/// Mutating operations take `&mut self`; see [`SharedStore`](crate::SharedStore)
/// for a handle that can be used from several threads.
///
/// # Example
///
/// ```rust
/// use txkv_core::TransactionalStore;
///
/// let mut store: TransactionalStore<String, i32> = TransactionalStore::new();
/// assert_eq!(store.get("A"), None);
///
/// store.begin()?;
/// store.put("A".to_string(), 1)?;
/// assert_eq!(store.get("A"), Some(&1));
/// store.commit()?;
///
/// assert_eq!(store.get("A"), Some(&1));
/// # Ok::<(), txkv_core::StoreError>(())
/// ```
pub struct TransactionalStore<K, V> {
    /// Configuration.
    config: StoreConfig,
    /// Committed state.
    base: HashMap<K, V>,
    /// Open transaction, if any.
    pending: Option<Transaction<K, V>>,
    /// Next transaction ID.
    next_txid: TransactionId,
    /// Operation counters.
    stats: StoreStats,
}

impl<K, V> TransactionalStore<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty store with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates an empty store with the given configuration.
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            base: HashMap::with_capacity(config.base_capacity),
            config,
            pending: None,
            next_txid: TransactionId::new(1),
            stats: StoreStats::new(),
        }
    }

    /// Reads a key.
    ///
    /// Inside a transaction, a key written by that transaction returns the
    /// pending value. Otherwise the committed value is returned, or `None`
    /// if the key was never committed.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.stats.record_read();
        self.pending
            .as_ref()
            .and_then(|txn| txn.get_pending_write(key))
            .or_else(|| self.base.get(key))
    }

    /// Returns true if `get` would return a value for the key.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.pending
            .as_ref()
            .is_some_and(|txn| txn.get_pending_write(key).is_some())
            || self.base.contains_key(key)
    }

    /// Writes a key in the open transaction.
    ///
    /// A later write to the same key in the same transaction replaces the
    /// earlier one. The committed map is untouched until `commit`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoActiveTransaction`] if no transaction is open.
    pub fn put(&mut self, key: K, value: V) -> StoreResult<()> {
        let Some(txn) = self.pending.as_mut() else {
            return Err(self.reject(StoreError::no_active_transaction("put")));
        };
        txn.put(key, value);
        trace!(txid = %txn.id(), pending = txn.write_count(), "put");
        self.stats.record_write();
        Ok(())
    }

    /// Opens a transaction with an empty overlay.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TransactionAlreadyActive`] if a transaction is
    /// already open; the open transaction is left untouched.
    pub fn begin(&mut self) -> StoreResult<()> {
        if let Some(txn) = &self.pending {
            let active = txn.id();
            return Err(self.reject(StoreError::already_active(active)));
        }

        let txid = self.next_txid;
        self.next_txid = txid.next();
        self.pending = Some(Transaction::new(txid, self.config.overlay_capacity));
        self.stats.record_transaction_start();
        debug!(txid = %txid, "transaction started");
        Ok(())
    }

    /// Commits the open transaction.
    ///
    /// Every pending write is merged into the committed map, overwriting
    /// existing values, and the store returns to idle.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoActiveTransaction`] if no transaction is open.
    pub fn commit(&mut self) -> StoreResult<()> {
        let Some(txn) = self.pending.take() else {
            return Err(self.reject(StoreError::no_active_transaction("commit")));
        };

        let txid = txn.id();
        let writes = txn.into_writes();
        let keys = writes.len();
        self.base.extend(writes);

        self.stats.record_transaction_commit(keys as u64);
        debug!(txid = %txid, keys, "transaction committed");
        Ok(())
    }

    /// Rolls back the open transaction.
    ///
    /// All pending writes are discarded and the store returns to idle.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoActiveTransaction`] if no transaction is open.
    pub fn rollback(&mut self) -> StoreResult<()> {
        let Some(txn) = self.pending.take() else {
            return Err(self.reject(StoreError::no_active_transaction("rollback")));
        };

        self.stats.record_transaction_rollback();
        debug!(txid = %txn.id(), discarded = txn.write_count(), "transaction rolled back");
        Ok(())
    }

    /// Runs `f` inside a transaction.
    ///
    /// The transaction is committed if `f` returns `Ok` and rolled back if
    /// it returns `Err`. If `f` closes the transaction itself, the final
    /// commit fails with [`StoreError::NoActiveTransaction`].
    ///
    /// # Errors
    ///
    /// Returns the error from `begin`, from `f`, or from the final commit.
    ///
    /// # Example
    ///
    /// ```rust
    /// use txkv_core::{StoreError, TransactionalStore};
    ///
    /// let mut store: TransactionalStore<&str, i32> = TransactionalStore::new();
    /// store.transaction(|s| {
    ///     s.put("X", 100)?;
    ///     s.put("Y", 200)?;
    ///     Ok::<_, StoreError>(())
    /// })?;
    /// assert_eq!(store.get("X"), Some(&100));
    /// # Ok::<(), StoreError>(())
    /// ```
    pub fn transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.begin()?;
        match f(self) {
            Ok(value) => {
                self.commit()?;
                Ok(value)
            }
            Err(err) => {
                if self.is_active() {
                    self.rollback()?;
                }
                Err(err)
            }
        }
    }

    /// Returns an iterator over the committed entries, in no particular order.
    pub fn committed(&self) -> impl Iterator<Item = (&K, &V)> {
        self.base.iter()
    }

    /// Returns the number of committed keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.base.len()
    }

    /// Returns true if nothing has been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }
}

impl<K, V> TransactionalStore<K, V> {
    /// Returns true if a transaction is open.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the current transaction state.
    #[must_use]
    pub fn state(&self) -> StoreState {
        if self.is_active() {
            StoreState::Active
        } else {
            StoreState::Idle
        }
    }

    /// Returns the ID of the open transaction.
    #[must_use]
    pub fn active_transaction(&self) -> Option<TransactionId> {
        self.pending.as_ref().map(Transaction::id)
    }

    /// Returns the number of pending writes (0 when idle).
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.as_ref().map_or(0, Transaction::write_count)
    }

    /// Returns the store's operation counters.
    #[must_use]
    pub fn stats(&self) -> &StoreStats {
        &self.stats
    }

    /// Returns the store configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn reject(&self, err: StoreError) -> StoreError {
        self.stats.record_rejected();
        err
    }
}

impl<K, V> Default for TransactionalStore<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> std::fmt::Debug for TransactionalStore<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionalStore")
            .field("state", &self.state())
            .field("committed", &self.base.len())
            .field("pending", &self.pending_len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_store() -> TransactionalStore<String, i32> {
        TransactionalStore::new()
    }

    fn seeded(entries: &[(&str, i32)]) -> TransactionalStore<String, i32> {
        let mut store = create_store();
        store.begin().unwrap();
        for (k, v) in entries {
            store.put((*k).to_string(), *v).unwrap();
        }
        store.commit().unwrap();
        store
    }

    #[test]
    fn get_missing_key_is_none() {
        let store = create_store();
        assert_eq!(store.get("A"), None);
        assert!(!store.contains_key("A"));
    }

    #[test]
    fn put_without_transaction_fails() {
        let mut store = seeded(&[("A", 1)]);

        let err = store.put("A".to_string(), 2).unwrap_err();
        assert_eq!(err, StoreError::no_active_transaction("put"));
        assert_eq!(store.get("A"), Some(&1));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn begin_sees_base_values() {
        let mut store = seeded(&[("A", 1)]);
        store.begin().unwrap();
        assert_eq!(store.get("A"), Some(&1));
        assert!(store.contains_key("A"));
    }

    #[test]
    fn read_your_own_writes() {
        let mut store = seeded(&[("A", 1)]);
        store.begin().unwrap();
        store.put("A".to_string(), 5).unwrap();
        store.put("B".to_string(), 6).unwrap();

        assert_eq!(store.get("A"), Some(&5));
        assert_eq!(store.get("B"), Some(&6));

        // Base is unaffected until commit
        let committed: HashMap<_, _> = store.committed().collect();
        assert_eq!(committed.len(), 1);
        assert_eq!(committed[&"A".to_string()], &1);
    }

    #[test]
    fn commit_applies_overlay() {
        let mut store = seeded(&[("A", 1), ("B", 2)]);
        store.begin().unwrap();
        store.put("A".to_string(), 10).unwrap();
        store.put("C".to_string(), 30).unwrap();
        store.commit().unwrap();

        assert!(!store.is_active());
        assert_eq!(store.state(), StoreState::Idle);
        assert_eq!(store.pending_len(), 0);
        assert_eq!(store.get("A"), Some(&10));
        assert_eq!(store.get("B"), Some(&2));
        assert_eq!(store.get("C"), Some(&30));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn rollback_discards_overlay() {
        let mut store = seeded(&[("A", 1)]);
        store.begin().unwrap();
        store.put("A".to_string(), 10).unwrap();
        store.put("B".to_string(), 20).unwrap();
        store.rollback().unwrap();

        assert!(!store.is_active());
        assert_eq!(store.get("A"), Some(&1));
        assert_eq!(store.get("B"), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn begin_while_active_fails_and_keeps_overlay() {
        let mut store = create_store();
        store.begin().unwrap();
        store.put("A".to_string(), 1).unwrap();
        let active = store.active_transaction().unwrap();

        let err = store.begin().unwrap_err();
        assert_eq!(err, StoreError::already_active(active));
        assert_eq!(store.active_transaction(), Some(active));
        assert_eq!(store.pending_len(), 1);
        assert_eq!(store.get("A"), Some(&1));
    }

    #[test]
    fn commit_and_rollback_while_idle_fail() {
        let mut store = seeded(&[("A", 1)]);

        let err = store.commit().unwrap_err();
        assert_eq!(err.to_string(), "no active transaction to commit");
        let err = store.rollback().unwrap_err();
        assert_eq!(err.to_string(), "no active transaction to rollback");

        assert_eq!(store.get("A"), Some(&1));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn empty_transaction_commit_is_noop() {
        let mut store = seeded(&[("A", 1)]);
        store.begin().unwrap();
        assert!(store.is_active());
        assert_eq!(store.pending_len(), 0);
        store.commit().unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn transaction_ids_increase() {
        let mut store = create_store();
        assert_eq!(store.active_transaction(), None);

        store.begin().unwrap();
        let first = store.active_transaction().unwrap();
        store.rollback().unwrap();

        store.begin().unwrap();
        let second = store.active_transaction().unwrap();
        store.commit().unwrap();

        assert_eq!(first, TransactionId::new(1));
        assert!(second > first);
    }

    // === Scenarios ===

    #[test]
    fn scenario_update_within_transaction_then_commit() {
        let mut store = create_store();
        assert_eq!(store.get("A"), None);

        store.begin().unwrap();
        store.put("A".to_string(), 1).unwrap();
        assert_eq!(store.get("A"), Some(&1));
        store.put("A".to_string(), 12).unwrap();
        assert_eq!(store.get("A"), Some(&12));
        store.commit().unwrap();

        assert_eq!(store.get("A"), Some(&12));
    }

    #[test]
    fn scenario_rollback_hides_write() {
        let mut store = create_store();
        store.begin().unwrap();
        store.put("B".to_string(), 2).unwrap();
        assert_eq!(store.get("B"), Some(&2));
        store.rollback().unwrap();

        assert_eq!(store.get("B"), None);
    }

    #[test]
    fn scenario_commit_then_rolled_back_overwrite() {
        let mut store = create_store();
        store.begin().unwrap();
        store.put("X".to_string(), 100).unwrap();
        store.put("Y".to_string(), 200).unwrap();
        store.commit().unwrap();

        store.begin().unwrap();
        store.put("X".to_string(), 300).unwrap();
        store.put("Z".to_string(), 400).unwrap();
        assert_eq!(store.get("X"), Some(&300));
        assert_eq!(store.get("Z"), Some(&400));
        store.rollback().unwrap();

        assert_eq!(store.get("X"), Some(&100));
        assert_eq!(store.get("Y"), Some(&200));
        assert_eq!(store.get("Z"), None);
    }

    // === Closure transactions ===

    #[test]
    fn transaction_commits_on_ok() {
        let mut store = create_store();
        let n = store
            .transaction(|s| {
                s.put("A".to_string(), 1)?;
                s.put("B".to_string(), 2)?;
                Ok::<_, StoreError>(s.pending_len())
            })
            .unwrap();

        assert_eq!(n, 2);
        assert!(!store.is_active());
        assert_eq!(store.get("B"), Some(&2));
    }

    #[test]
    fn transaction_rolls_back_on_err() {
        #[derive(Debug, PartialEq)]
        enum AppError {
            Store(StoreError),
            Invalid,
        }

        impl From<StoreError> for AppError {
            fn from(err: StoreError) -> Self {
                Self::Store(err)
            }
        }

        let mut store = seeded(&[("A", 1)]);
        let result: Result<(), AppError> = store.transaction(|s| {
            s.put("A".to_string(), 99)?;
            Err(AppError::Invalid)
        });

        assert_eq!(result, Err(AppError::Invalid));
        assert!(!store.is_active());
        assert_eq!(store.get("A"), Some(&1));
    }

    #[test]
    fn transaction_fails_if_already_active() {
        let mut store = create_store();
        store.begin().unwrap();

        let result = store.transaction(|s| s.put("A".to_string(), 1));
        assert!(result.unwrap_err().is_already_active());
        assert_eq!(store.pending_len(), 0);
    }

    #[test]
    fn transaction_closed_by_closure_reports_commit_error() {
        let mut store = create_store();
        let result = store.transaction(|s| {
            s.put("A".to_string(), 1)?;
            s.rollback()
        });

        assert_eq!(result, Err(StoreError::no_active_transaction("commit")));
        assert_eq!(store.get("A"), None);
    }

    // === Stats ===

    #[test]
    fn stats_track_operations() {
        let mut store = create_store();
        let _ = store.put("A".to_string(), 1);
        store.begin().unwrap();
        store.put("A".to_string(), 1).unwrap();
        store.put("B".to_string(), 2).unwrap();
        let _ = store.get("A");
        store.commit().unwrap();
        store.begin().unwrap();
        store.rollback().unwrap();
        let _ = store.rollback();

        let snap = store.stats().snapshot();
        assert_eq!(snap.reads, 1);
        assert_eq!(snap.writes, 2);
        assert_eq!(snap.transactions_started, 2);
        assert_eq!(snap.transactions_committed, 1);
        assert_eq!(snap.transactions_rolled_back, 1);
        assert_eq!(snap.keys_committed, 2);
        assert_eq!(snap.rejected, 2);
    }

    #[test]
    fn debug_reports_state() {
        let mut store = seeded(&[("A", 1)]);
        store.begin().unwrap();
        let out = format!("{store:?}");
        assert!(out.contains("Active"));
        assert!(out.contains("committed: 1"));
    }

    #[test]
    fn with_config_applies_capacity() {
        let store: TransactionalStore<String, i32> =
            TransactionalStore::with_config(StoreConfig::new().base_capacity(64));
        assert_eq!(store.config().base_capacity, 64);
        assert!(store.is_empty());
    }
}

//! Thread-safe store handle.

use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::stats::StatsSnapshot;
use crate::store::TransactionalStore;
use crate::types::{StoreState, TransactionId};
use parking_lot::Mutex;
use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

/// A cloneable, thread-safe handle to a [`TransactionalStore`].
///
/// Every operation takes the same lock for its whole duration, so `commit`
/// merges the overlay in a single critical section and a concurrent `get`
/// never observes a partially applied commit.
///
/// All clones share one store and therefore one transaction: a `begin` from
/// any handle while a transaction is open is rejected, not queued.
///
/// # Example
///
/// ```rust
/// use txkv_core::SharedStore;
/// use std::thread;
///
/// let store: SharedStore<String, u64> = SharedStore::new();
/// store.begin()?;
///
/// let writer = store.clone();
/// thread::spawn(move || writer.put("A".to_string(), 1))
///     .join()
///     .unwrap()?;
///
/// store.commit()?;
/// assert_eq!(store.get("A"), Some(1));
/// # Ok::<(), txkv_core::StoreError>(())
/// ```
pub struct SharedStore<K, V> {
    inner: Arc<Mutex<TransactionalStore<K, V>>>,
}

impl<K, V> SharedStore<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty shared store with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_store(TransactionalStore::new())
    }

    /// Creates an empty shared store with the given configuration.
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self::from_store(TransactionalStore::with_config(config))
    }

    /// Wraps an existing store.
    #[must_use]
    pub fn from_store(store: TransactionalStore<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Reads a key, returning a clone of the visible value.
    ///
    /// See [`TransactionalStore::get`] for visibility rules.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Writes a key in the open transaction.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveTransaction` if no transaction is open.
    pub fn put(&self, key: K, value: V) -> StoreResult<()> {
        self.inner.lock().put(key, value)
    }

    /// Opens a transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionAlreadyActive` if a transaction is already open.
    pub fn begin(&self) -> StoreResult<()> {
        self.inner.lock().begin()
    }

    /// Commits the open transaction under a single lock acquisition.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveTransaction` if no transaction is open.
    pub fn commit(&self) -> StoreResult<()> {
        self.inner.lock().commit()
    }

    /// Rolls back the open transaction.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveTransaction` if no transaction is open.
    pub fn rollback(&self) -> StoreResult<()> {
        self.inner.lock().rollback()
    }

    /// Runs `f` with exclusive access to the underlying store.
    ///
    /// The lock is held until `f` returns, which makes a sequence of
    /// operations appear atomic to other handles.
    pub fn with_store<T>(&self, f: impl FnOnce(&mut TransactionalStore<K, V>) -> T) -> T {
        f(&mut self.inner.lock())
    }

    /// Returns the number of committed keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns true if nothing has been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl<K, V> SharedStore<K, V> {
    /// Returns true if a transaction is open.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.lock().is_active()
    }

    /// Returns the current transaction state.
    #[must_use]
    pub fn state(&self) -> StoreState {
        self.inner.lock().state()
    }

    /// Returns the ID of the open transaction.
    #[must_use]
    pub fn active_transaction(&self) -> Option<TransactionId> {
        self.inner.lock().active_transaction()
    }

    /// Returns a snapshot of the store's counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.lock().stats().snapshot()
    }
}

impl<K, V> Clone for SharedStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> Default for SharedStore<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> std::fmt::Debug for SharedStore<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStore")
            .field("store", &*self.inner.lock())
            .finish()
    }
}

//! Transaction state.

use crate::types::TransactionId;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// An open transaction.
///
/// Holds the pending writes of the transaction. Writing the same key twice
/// keeps a single entry with the latest value.
#[derive(Debug, Clone)]
pub struct Transaction<K, V> {
    /// Transaction ID.
    id: TransactionId,
    /// Pending writes: key -> latest value written in this transaction.
    writes: HashMap<K, V>,
}

impl<K, V> Transaction<K, V>
where
    K: Eq + Hash,
{
    /// Creates a new, empty transaction.
    pub(crate) fn new(id: TransactionId, capacity: usize) -> Self {
        Self {
            id,
            writes: HashMap::with_capacity(capacity),
        }
    }

    /// Records a write, replacing any earlier write to the same key.
    pub(crate) fn put(&mut self, key: K, value: V) {
        self.writes.insert(key, value);
    }

    /// Gets the pending value for a key.
    #[must_use]
    pub fn get_pending_write<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.writes.get(key)
    }
}

impl<K, V> Transaction<K, V> {
    /// Returns the transaction ID.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Returns all pending writes.
    pub fn pending_writes(&self) -> impl Iterator<Item = (&K, &V)> {
        self.writes.iter()
    }

    /// Returns the number of pending writes.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// Consumes the transaction, yielding its writes.
    pub(crate) fn into_writes(self) -> HashMap<K, V> {
        self.writes
    }
}

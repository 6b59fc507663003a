//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up stores in a known state.

use txkv_core::{SharedStore, TransactionalStore};

/// Store type used throughout the testkit.
pub type TestStore = TransactionalStore<String, i64>;

/// Creates a store whose committed state holds `entries`.
///
/// The entries are written and committed in a single transaction, so the
/// returned store is idle and its counters reflect that one transaction.
pub fn seeded_store(entries: &[(&str, i64)]) -> TestStore {
    let mut store = TestStore::new();
    store.begin().expect("Failed to begin seed transaction");
    for (key, value) in entries {
        store
            .put((*key).to_string(), *value)
            .expect("Failed to write seed entry");
    }
    store.commit().expect("Failed to commit seed transaction");
    store
}

/// Creates a store committed with `base` and an open transaction holding `pending`.
pub fn store_in_transaction(base: &[(&str, i64)], pending: &[(&str, i64)]) -> TestStore {
    let mut store = seeded_store(base);
    store.begin().expect("Failed to begin transaction");
    for (key, value) in pending {
        store
            .put((*key).to_string(), *value)
            .expect("Failed to write pending entry");
    }
    store
}

/// Creates a shared store whose committed state holds `entries`.
pub fn seeded_shared_store(entries: &[(&str, i64)]) -> SharedStore<String, i64> {
    SharedStore::from_store(seeded_store(entries))
}

/// Runs a test with a fresh, empty store.
///
/// # Example
///
/// ```rust
/// use txkv_testkit::with_store;
///
/// with_store(|store| {
///     store.begin().unwrap();
///     store.put("A".to_string(), 1).unwrap();
///     assert_eq!(store.get("A"), Some(&1));
/// });
/// ```
pub fn with_store<F, R>(f: F) -> R
where
    F: FnOnce(&mut TestStore) -> R,
{
    let mut store = TestStore::new();
    f(&mut store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_store_is_idle_with_entries() {
        let store = seeded_store(&[("A", 1), ("B", 2)]);
        assert!(!store.is_active());
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("B"), Some(&2));
        assert_eq!(store.stats().transactions_committed(), 1);
    }

    #[test]
    fn store_in_transaction_layers_pending_over_base() {
        let store = store_in_transaction(&[("A", 1)], &[("A", 2), ("C", 3)]);
        assert!(store.is_active());
        assert_eq!(store.pending_len(), 2);
        assert_eq!(store.get("A"), Some(&2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn seeded_shared_store_exposes_entries() {
        let store = seeded_shared_store(&[("X", 100)]);
        assert_eq!(store.get("X"), Some(100));
    }

    #[test]
    fn with_store_returns_closure_result() {
        let pending = with_store(|store| {
            store.begin().unwrap();
            store.put("A".to_string(), 1).unwrap();
            store.pending_len()
        });
        assert_eq!(pending, 1);
    }
}

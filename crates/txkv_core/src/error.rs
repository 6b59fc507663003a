//! Error types for TxKV core.

use crate::types::TransactionId;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by transactional store operations.
///
/// Both kinds are caller-correctable: they report that an operation was
/// invoked in the wrong transaction state. A rejected operation leaves the
/// store exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `put`, `commit` or `rollback` was invoked while no transaction is open.
    ///
    /// The message names the rejected operation, e.g. "no active transaction to put".
    #[error("no active transaction to {operation}")]
    NoActiveTransaction {
        /// The operation that was rejected.
        operation: &'static str,
    },

    /// `begin` was invoked while a transaction is already open.
    #[error("a transaction is already active ({active})")]
    TransactionAlreadyActive {
        /// The transaction that is currently open.
        active: TransactionId,
    },
}

impl StoreError {
    /// Creates a no-active-transaction error for the named operation.
    pub fn no_active_transaction(operation: &'static str) -> Self {
        Self::NoActiveTransaction { operation }
    }

    /// Creates an already-active error for the open transaction.
    pub fn already_active(active: TransactionId) -> Self {
        Self::TransactionAlreadyActive { active }
    }

    /// Returns true if this is a `NoActiveTransaction` error.
    #[must_use]
    pub fn is_no_active_transaction(&self) -> bool {
        matches!(self, Self::NoActiveTransaction { .. })
    }

    /// Returns true if this is a `TransactionAlreadyActive` error.
    #[must_use]
    pub fn is_already_active(&self) -> bool {
        matches!(self, Self::TransactionAlreadyActive { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_operation() {
        assert_eq!(
            StoreError::no_active_transaction("commit").to_string(),
            "no active transaction to commit"
        );
        assert_eq!(
            StoreError::no_active_transaction("put").to_string(),
            "no active transaction to put"
        );
        assert_eq!(
            StoreError::already_active(TransactionId::new(3)).to_string(),
            "a transaction is already active (txn:3)"
        );
    }

    #[test]
    fn kind_predicates() {
        assert!(StoreError::no_active_transaction("put").is_no_active_transaction());
        assert!(!StoreError::no_active_transaction("put").is_already_active());
        assert!(StoreError::already_active(TransactionId::new(1)).is_already_active());
    }
}

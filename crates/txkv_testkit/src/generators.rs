//! Property-based test generators using proptest.
//!
//! Keys are drawn from a small alphabet so that generated sequences write,
//! overwrite and read the same keys often.

use proptest::prelude::*;

/// A store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Open a transaction.
    Begin,
    /// Write a key.
    Put {
        /// Key to write.
        key: String,
        /// Value to write.
        value: i64,
    },
    /// Read a key.
    Get {
        /// Key to read.
        key: String,
    },
    /// Commit the open transaction.
    Commit,
    /// Roll back the open transaction.
    Rollback,
}

/// Strategy for generating keys from a small alphabet.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-F]").expect("Invalid regex")
}

/// Strategy for generating values.
pub fn value_strategy() -> impl Strategy<Value = i64> {
    -1000i64..1000
}

/// Strategy for generating a single operation.
///
/// Writes and reads dominate; state transitions are frequent enough that
/// sequences exercise both valid and rejected calls.
pub fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Begin),
        4 => (key_strategy(), value_strategy()).prop_map(|(key, value)| Op::Put { key, value }),
        3 => key_strategy().prop_map(|key| Op::Get { key }),
        1 => Just(Op::Commit),
        1 => Just(Op::Rollback),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn op_sequence_strategy(min_ops: usize, max_ops: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), min_ops..max_ops)
}

/// Strategy for generating a batch of writes for one transaction.
pub fn write_batch_strategy(max_writes: usize) -> impl Strategy<Value = Vec<(String, i64)>> {
    prop::collection::vec((key_strategy(), value_strategy()), 0..max_writes)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

//! Replay checking against a reference model.
//!
//! [`replay`] applies a sequence of [`Op`]s to a real store and to
//! [`Model`], a plain committed-map-plus-overlay model, and reports the
//! first operation whose observable result differs.

use crate::fixtures::TestStore;
use crate::generators::Op;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use txkv_core::{StoreError, StoreResult};

/// What an operation observably produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// The operation succeeded without returning a value.
    Done,
    /// A read returned this value.
    Value(Option<i64>),
    /// The operation was rejected because no transaction was open.
    NoActiveTransaction,
    /// The operation was rejected because a transaction was already open.
    AlreadyActive,
}

impl Observation {
    fn from_result(result: StoreResult<()>) -> Self {
        match result {
            Ok(()) => Self::Done,
            Err(StoreError::NoActiveTransaction { .. }) => Self::NoActiveTransaction,
            Err(StoreError::TransactionAlreadyActive { .. }) => Self::AlreadyActive,
        }
    }
}

/// Reference model of a single-transaction store.
#[derive(Debug, Clone, Default)]
pub struct Model {
    committed: HashMap<String, i64>,
    pending: Option<HashMap<String, i64>>,
}

impl Model {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one operation to the model.
    pub fn apply(&mut self, op: &Op) -> Observation {
        match op {
            Op::Begin => {
                if self.pending.is_some() {
                    return Observation::AlreadyActive;
                }
                self.pending = Some(HashMap::new());
                Observation::Done
            }
            Op::Put { key, value } => match self.pending.as_mut() {
                Some(pending) => {
                    pending.insert(key.clone(), *value);
                    Observation::Done
                }
                None => Observation::NoActiveTransaction,
            },
            Op::Get { key } => Observation::Value(
                self.pending
                    .as_ref()
                    .and_then(|p| p.get(key))
                    .or_else(|| self.committed.get(key))
                    .copied(),
            ),
            Op::Commit => match self.pending.take() {
                Some(pending) => {
                    self.committed.extend(pending);
                    Observation::Done
                }
                None => Observation::NoActiveTransaction,
            },
            Op::Rollback => match self.pending.take() {
                Some(_) => Observation::Done,
                None => Observation::NoActiveTransaction,
            },
        }
    }

    /// Returns the committed state, sorted by key.
    #[must_use]
    pub fn committed(&self) -> BTreeMap<String, i64> {
        self.committed
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }

    /// Returns true if the model has an open transaction.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }
}

/// Applies one operation to a store.
pub fn apply_to_store(store: &mut TestStore, op: &Op) -> Observation {
    match op {
        Op::Begin => Observation::from_result(store.begin()),
        Op::Put { key, value } => Observation::from_result(store.put(key.clone(), *value)),
        Op::Get { key } => Observation::Value(store.get(key.as_str()).copied()),
        Op::Commit => Observation::from_result(store.commit()),
        Op::Rollback => Observation::from_result(store.rollback()),
    }
}

/// Returns the committed state of a store, sorted by key.
pub fn committed_state(store: &TestStore) -> BTreeMap<String, i64> {
    store.committed().map(|(k, v)| (k.clone(), *v)).collect()
}

/// The first point where a store and the model disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Divergence {
    /// An operation produced different observations.
    Operation {
        /// Index of the operation in the sequence.
        index: usize,
        /// The operation.
        op: Op,
        /// What the model produced.
        expected: Observation,
        /// What the store produced.
        actual: Observation,
    },
    /// The committed states differ after the whole sequence.
    CommittedState {
        /// The model's committed state.
        expected: BTreeMap<String, i64>,
        /// The store's committed state.
        actual: BTreeMap<String, i64>,
    },
    /// The transaction states differ after the whole sequence.
    ActiveState {
        /// Whether the model has an open transaction.
        expected: bool,
        /// Whether the store has an open transaction.
        actual: bool,
    },
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operation {
                index,
                op,
                expected,
                actual,
            } => write!(
                f,
                "op #{index} {op:?}: expected {expected:?}, got {actual:?}"
            ),
            Self::CommittedState { expected, actual } => {
                write!(f, "committed state: expected {expected:?}, got {actual:?}")
            }
            Self::ActiveState { expected, actual } => {
                write!(f, "active: expected {expected}, got {actual}")
            }
        }
    }
}

/// Replays `ops` on `store` and on a fresh model.
///
/// The store is expected to start empty and idle.
pub fn replay(store: &mut TestStore, ops: &[Op]) -> Result<(), Divergence> {
    let mut model = Model::new();

    for (index, op) in ops.iter().enumerate() {
        let expected = model.apply(op);
        let actual = apply_to_store(store, op);
        if expected != actual {
            return Err(Divergence::Operation {
                index,
                op: op.clone(),
                expected,
                actual,
            });
        }
    }

    let expected = model.committed();
    let actual = committed_state(store);
    if expected != actual {
        return Err(Divergence::CommittedState { expected, actual });
    }

    if model.is_active() != store.is_active() {
        return Err(Divergence::ActiveState {
            expected: model.is_active(),
            actual: store.is_active(),
        });
    }

    Ok(())
}

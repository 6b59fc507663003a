//! Transaction overlay.
//!
//! A store has at most one open transaction. Its writes live in an overlay
//! that reads consult before the committed map, and that is either merged
//! into the committed map on commit or dropped on rollback.

mod state;

pub use state::Transaction;

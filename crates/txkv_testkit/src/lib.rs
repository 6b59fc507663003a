//! # TxKV Testkit
//!
//! Test utilities for TxKV.
//!
//! This crate provides:
//! - Store fixtures in known committed and pending states
//! - Property-based test generators using proptest
//! - Replay checking of operation sequences against a reference model
//!
//! ## Usage
//!
//! ```rust
//! use txkv_testkit::prelude::*;
//!
//! let store = seeded_store(&[("A", 1)]);
//! assert_eq!(store.get("A"), Some(&1));
//!
//! let ops = [Op::Begin, Op::Rollback, Op::Commit];
//! replay(&mut TestStore::new(), &ops).unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod replay;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::replay::*;
}

pub use fixtures::*;
pub use generators::*;
pub use replay::*;

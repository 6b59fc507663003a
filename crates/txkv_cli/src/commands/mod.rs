//! CLI command implementations.

pub mod exec;

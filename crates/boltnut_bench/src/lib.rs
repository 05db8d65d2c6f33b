//! Shared helpers for the boltnut benchmarks.

pub mod utils;

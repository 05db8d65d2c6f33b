//! # boltnut Testkit
//!
//! Test utilities for boltnut.
//!
//! This crate provides:
//! - Test fixtures and database helpers
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use boltnut_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_database() {
//!     with_temp_db(&["users"], |db| {
//!         db.write_tx(|txn| txn.require_bucket::<Person>("users")?.insert(b"k", &person))
//!             .unwrap();
//!     });
//! }
//! ```

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;

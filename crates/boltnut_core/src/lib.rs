//! # boltnut Core
//!
//! Typed buckets over an embedded, transactional, ordered key-value store.
//!
//! The storage engine ([`redb`]) provides the file format, the copy-on-write
//! B-tree, ACID transactions with one writer and many snapshot readers, and
//! named tables. This crate binds those byte-oriented tables to Rust types:
//!
//! - [`Database`] opens the file, provisions buckets and runs transactions
//! - [`Transaction`] resolves buckets inside one read or write transaction
//! - [`Bucket<V>`] gets, inserts, updates, deletes and iterates values of `V`
//! - [`int_to_key`] and [`ordered_key`] build fixed-width integer keys
//!
//! Values are encoded with a [`ValueCodec`] (CBOR by default), so any
//! `serde` type can be stored without a schema.
//!
//! ## Example
//!
//! ```rust,ignore
//! use boltnut_core::{int_to_key, Database};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct User {
//!     name: String,
//! }
//!
//! let db = Database::open("app.db", &["users"])?;
//!
//! db.write_tx(|txn| {
//!     let mut users = txn.require_bucket::<User>("users")?;
//!     users.insert(int_to_key(1u64), &User { name: "Ann".into() })
//! })?;
//!
//! let ann = db.read_tx(|txn| txn.require_bucket::<User>("users")?.get(int_to_key(1u64)))?;
//! ```

mod bucket;
mod config;
mod database;
mod error;
mod keys;
mod transaction;

pub use bucket::{validate_bucket_name, Bucket, MAX_BUCKET_NAME_LEN};
pub use config::Config;
pub use database::Database;
pub use error::{CoreError, CoreResult};
pub use keys::{int_to_key, key_to_i64, key_to_u64, ordered_key, IntKey};
pub use transaction::Transaction;

pub use boltnut_codec::{Cbor, CodecError, Json, ValueCodec};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

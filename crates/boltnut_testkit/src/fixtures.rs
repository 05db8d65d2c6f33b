//! Test fixtures and database helpers.
//!
//! Provides convenience functions for setting up test databases
//! and common test scenarios.

use boltnut_core::{CoreResult, Database};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// File name used for file-backed test databases.
pub const TEST_DB_FILE: &str = "test.boltnut";

/// A test database with automatic cleanup.
pub struct TestDatabase {
    /// The database instance.
    pub db: Database,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestDatabase {
    /// Creates a new in-memory test database with the given buckets.
    pub fn memory(buckets: &[&str]) -> Self {
        Self {
            db: Database::open_in_memory(buckets).expect("Failed to open in-memory database"),
            _temp_dir: None,
        }
    }

    /// Creates a new file-based test database with the given buckets.
    pub fn file(buckets: &[&str]) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db = Database::open(temp_dir.path().join(TEST_DB_FILE), buckets)
            .expect("Failed to open file database");

        Self {
            db,
            _temp_dir: Some(temp_dir),
        }
    }

    /// Returns the database path if file-based, None if in-memory.
    pub fn path(&self) -> Option<PathBuf> {
        self._temp_dir.as_ref().map(|d| d.path().join(TEST_DB_FILE))
    }

    /// Closes and reopens a file-based database, keeping its data.
    ///
    /// # Panics
    ///
    /// Panics for in-memory databases, which do not survive closing.
    pub fn reopen(self, buckets: &[&str]) -> Self {
        let path = self.path().expect("Cannot reopen an in-memory database");
        let Self { db, _temp_dir } = self;
        db.close().expect("Failed to close database");
        drop(db);

        Self {
            db: Database::open(&path, buckets).expect("Failed to reopen database"),
            _temp_dir,
        }
    }
}

impl std::ops::Deref for TestDatabase {
    type Target = Database;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// Runs a test with a temporary in-memory database.
///
/// # Example
///
/// ```rust,ignore
/// use boltnut_testkit::with_temp_db;
///
/// #[test]
/// fn my_test() {
///     with_temp_db(&["users"], |db| {
///         // ... test operations
///     });
/// }
/// ```
pub fn with_temp_db<F, R>(buckets: &[&str], f: F) -> R
where
    F: FnOnce(&Database) -> R,
{
    let test_db = TestDatabase::memory(buckets);
    f(&test_db.db)
}

/// Runs a test with a temporary file-based database.
pub fn with_file_db<F, R>(buckets: &[&str], f: F) -> R
where
    F: FnOnce(&Database, &Path) -> R,
{
    let test_db = TestDatabase::file(buckets);
    let path = test_db.path().expect("File database has a path");
    f(&test_db.db, &path)
}

/// A sample record with nested and optional fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Email address, if known.
    pub email: Option<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Home address.
    pub address: Address,
}

/// Postal address embedded in [`Person`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Street and number.
    pub street: String,
    /// City name.
    pub city: String,
}

impl Person {
    /// Creates a person with the given name and age and default extras.
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            age,
            email: None,
            tags: Vec::new(),
            address: Address {
                street: "1 Main St".to_string(),
                city: "Springfield".to_string(),
            },
        }
    }
}

/// Inserts `people` into `bucket` keyed by their position, in one transaction.
pub fn seed_people(db: &Database, bucket: &str, people: &[Person]) -> CoreResult<()> {
    db.write_tx(|txn| {
        let mut target = txn.require_bucket::<Person>(bucket)?;
        for (i, person) in people.iter().enumerate() {
            target.insert(boltnut_core::int_to_key(i as u64), person)?;
        }
        Ok(())
    })
}

//! Database facade.

use crate::bucket::validate_bucket_name;
use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::transaction::Transaction;
use boltnut_codec::{Cbor, ValueCodec};
use parking_lot::RwLock;
use std::fmt;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The main database handle.
///
/// `Database` owns the storage engine handle and hands out transactions:
/// - [`Database::read_tx`] runs a closure against a consistent snapshot
/// - [`Database::write_tx`] runs a closure in the single read-write
///   transaction, committing on `Ok` and rolling back on `Err`
///
/// Values are encoded with the codec `C`, CBOR by default.
///
/// # Opening a Database
///
/// ```rust,ignore
/// use boltnut_core::{int_to_key, Database};
///
/// // Open or create the file and make sure "users" exists
/// let db = Database::open("app.db", &["users"])?;
///
/// db.write_tx(|txn| {
///     let mut users = txn.require_bucket::<User>("users")?;
///     users.insert(int_to_key(1u64), &User { name: "Ann".into() })
/// })?;
///
/// db.close()?;
/// ```
///
/// # In-Memory Databases
///
/// For testing, use `Database::open_in_memory()`:
///
/// ```rust,ignore
/// let db = Database::open_in_memory(&["users"])?;
/// ```
pub struct Database<C: ValueCodec = Cbor> {
    /// Configuration.
    config: Config,
    /// Backing file. None for in-memory databases.
    path: Option<PathBuf>,
    /// Engine handle; None once closed.
    engine: RwLock<Option<redb::Database>>,
    /// Codec marker.
    _codec: PhantomData<fn() -> C>,
}

impl Database {
    /// Opens or creates the database file at `path` and provisions `buckets`.
    ///
    /// Provisioning is idempotent: buckets that already exist, and the data
    /// in them, are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Another handle holds the file (`DatabaseLocked`)
    /// - A bucket cannot be provisioned (`BucketProvision`)
    /// - The engine fails to open the file
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let db = Database::open("app.db", &["users", "sessions"])?;
    /// ```
    pub fn open(path: impl AsRef<Path>, buckets: &[&str]) -> CoreResult<Self> {
        Self::open_with_config(path, Config::new().buckets(buckets.iter().copied()))
    }

    /// Opens a database with custom configuration.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use boltnut_core::{Config, Database};
    ///
    /// let config = Config::default()
    ///     .create_if_missing(false)
    ///     .sync_on_commit(false)
    ///     .buckets(["users"]);
    ///
    /// let db = Database::open_with_config("app.db", config)?;
    /// ```
    pub fn open_with_config(path: impl AsRef<Path>, config: Config) -> CoreResult<Self> {
        Self::open_with_codec(path, config)
    }

    /// Opens a fresh in-memory database for testing.
    ///
    /// Data is lost when the database is closed or dropped.
    pub fn open_in_memory(buckets: &[&str]) -> CoreResult<Self> {
        Self::in_memory_with_codec(Config::new().buckets(buckets.iter().copied()))
    }
}

impl<C: ValueCodec> Database<C> {
    /// Opens a database that encodes values with the codec `C`.
    ///
    /// ```rust,ignore
    /// use boltnut_core::{Config, Database, Json};
    ///
    /// let db = Database::<Json>::open_with_codec("app.db", Config::new())?;
    /// ```
    pub fn open_with_codec(path: impl AsRef<Path>, config: Config) -> CoreResult<Self> {
        let path = path.as_ref();
        let builder = Self::builder(&config);

        let engine = if config.create_if_missing {
            builder.create(path)?
        } else {
            if !path.exists() {
                return Err(CoreError::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!(
                        "database {} does not exist and create_if_missing is false",
                        path.display()
                    ),
                )));
            }
            builder.open(path)?
        };
        debug!(path = %path.display(), codec = C::NAME, "opened database");

        Self::from_engine(engine, Some(path.to_path_buf()), config)
    }

    /// Opens an in-memory database that encodes values with the codec `C`.
    pub fn in_memory_with_codec(config: Config) -> CoreResult<Self> {
        let engine =
            Self::builder(&config).create_with_backend(redb::backends::InMemoryBackend::new())?;
        debug!(codec = C::NAME, "opened in-memory database");

        Self::from_engine(engine, None, config)
    }

    fn builder(config: &Config) -> redb::Builder {
        let mut builder = redb::Builder::new();
        if let Some(bytes) = config.cache_size {
            builder.set_cache_size(bytes);
        }
        builder
    }

    fn from_engine(engine: redb::Database, path: Option<PathBuf>, config: Config) -> CoreResult<Self> {
        let db = Self {
            config,
            path,
            engine: RwLock::new(Some(engine)),
            _codec: PhantomData,
        };
        db.provision()?;
        Ok(db)
    }

    /// Creates every configured bucket that does not exist yet, atomically.
    fn provision(&self) -> CoreResult<()> {
        if self.config.buckets.is_empty() {
            return Ok(());
        }

        let created = self.write_tx(|txn| {
            let mut created = 0;
            for (index, name) in self.config.buckets.iter().enumerate() {
                let was_created = txn.create_bucket_if_missing(name).map_err(|source| {
                    CoreError::BucketProvision {
                        index,
                        name: name.clone(),
                        source: Box::new(source),
                    }
                })?;
                if was_created {
                    created += 1;
                }
            }
            Ok(created)
        })?;

        debug!(
            requested = self.config.buckets.len(),
            created, "provisioned buckets"
        );
        Ok(())
    }

    /// Executes a function within a read-only transaction.
    ///
    /// The function's result is returned unchanged; the transaction is
    /// released either way.
    pub fn read_tx<F, R>(&self, f: F) -> CoreResult<R>
    where
        F: FnOnce(&Transaction<C>) -> CoreResult<R>,
    {
        let guard = self.engine.read_recursive();
        let engine = guard.as_ref().ok_or(CoreError::DatabaseClosed)?;

        let txn = Transaction::read(engine.begin_read()?);
        let result = f(&txn);
        txn.commit()?;
        result
    }

    /// Executes a function within the read-write transaction.
    ///
    /// If the function returns `Ok`, the transaction is committed.
    /// If it returns `Err`, the transaction is rolled back and the error is
    /// returned unchanged.
    ///
    /// Only one read-write transaction runs at a time; this call blocks
    /// until the engine grants it. Calling `write_tx` again from inside `f`
    /// therefore deadlocks.
    pub fn write_tx<F, R>(&self, f: F) -> CoreResult<R>
    where
        F: FnOnce(&Transaction<C>) -> CoreResult<R>,
    {
        let guard = self.engine.read_recursive();
        let engine = guard.as_ref().ok_or(CoreError::DatabaseClosed)?;

        let mut inner = engine.begin_write()?;
        inner.set_durability(self.config.durability());
        let txn = Transaction::write(inner);

        match f(&txn) {
            Ok(value) => {
                txn.commit()?;
                Ok(value)
            }
            Err(e) => {
                txn.rollback();
                Err(e)
            }
        }
    }

    /// Creates one additional bucket.
    ///
    /// # Errors
    ///
    /// - [`CoreError::BucketExists`] if the bucket already exists
    /// - [`CoreError::InvalidBucketName`] if the name is empty or too long
    pub fn create_bucket(&self, name: &str) -> CoreResult<()> {
        validate_bucket_name(name)?;
        self.write_tx(|txn| txn.create_bucket(name))
    }

    /// Returns the names of all buckets, sorted.
    pub fn bucket_names(&self) -> CoreResult<Vec<String>> {
        self.read_tx(|txn| txn.bucket_names())
    }

    /// Closes the database, releasing the file.
    ///
    /// Closing twice is a no-op. Every later transaction fails with
    /// [`CoreError::DatabaseClosed`]. Waits for running transactions.
    pub fn close(&self) -> CoreResult<()> {
        let mut engine = self.engine.write();
        if engine.take().is_some() {
            debug!(path = ?self.path, "closed database");
        }
        Ok(())
    }

    /// Checks if the database is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.engine.read_recursive().is_some()
    }

    /// Returns the backing file path, or `None` for in-memory databases.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns database configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<C: ValueCodec> fmt::Debug for Database<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.path)
            .field("is_open", &self.is_open())
            .field("codec", &C::NAME)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::int_to_key;
    use boltnut_codec::Json;

    fn create_db() -> Database {
        Database::open_in_memory(&["users"]).unwrap()
    }

    #[test]
    fn open_in_memory() {
        let db = create_db();
        assert!(db.is_open());
        assert!(db.path().is_none());
        assert_eq!(db.bucket_names().unwrap(), vec!["users".to_string()]);
    }

    #[test]
    fn write_tx_returns_closure_value() {
        let db = create_db();

        let count = db
            .write_tx(|txn| {
                let mut users = txn.require_bucket::<String>("users")?;
                users.insert(b"a", &"Ann".to_string())?;
                users.insert(b"b", &"Bob".to_string())?;
                users.len()
            })
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn write_tx_rolls_back_on_error() {
        let db = create_db();

        let result = db.write_tx(|txn| {
            txn.require_bucket::<String>("users")?
                .insert(b"a", &"Ann".to_string())?;
            Err::<(), _>(CoreError::bucket_not_found("abort"))
        });
        assert!(matches!(result, Err(CoreError::BucketNotFound { name }) if name == "abort"));

        let empty = db
            .read_tx(|txn| txn.require_bucket::<String>("users")?.is_empty())
            .unwrap();
        assert!(empty);
    }

    #[test]
    fn read_tx_returns_error_verbatim() {
        let db = create_db();

        let result: CoreResult<()> = db.read_tx(|_| Err(CoreError::bucket_exists("x")));
        assert!(matches!(result, Err(CoreError::BucketExists { name }) if name == "x"));
    }

    #[test]
    fn create_bucket_errors() {
        let db = create_db();

        db.create_bucket("posts").unwrap();
        assert!(matches!(
            db.create_bucket("posts"),
            Err(CoreError::BucketExists { .. })
        ));
        assert!(matches!(
            db.create_bucket(""),
            Err(CoreError::InvalidBucketName { .. })
        ));
        assert_eq!(
            db.bucket_names().unwrap(),
            vec!["posts".to_string(), "users".to_string()]
        );
    }

    #[test]
    fn provisioning_reports_failing_index() {
        let config = Config::new().buckets(["users", "", "posts"]);
        let result = Database::<Cbor>::in_memory_with_codec(config);

        match result {
            Err(CoreError::BucketProvision { index, source, .. }) => {
                assert_eq!(index, 1);
                assert!(matches!(*source, CoreError::InvalidBucketName { .. }));
            }
            other => panic!("expected BucketProvision, got {other:?}"),
        }
    }

    #[test]
    fn close_database() {
        let db = create_db();
        db.close().unwrap();
        assert!(!db.is_open());

        // Closing again is fine
        db.close().unwrap();

        let result = db.read_tx(|_| Ok(()));
        assert!(matches!(result, Err(CoreError::DatabaseClosed)));
        let result = db.write_tx(|_| Ok(()));
        assert!(matches!(result, Err(CoreError::DatabaseClosed)));
    }

    #[test]
    fn json_codec_database() {
        let db = Database::<Json>::in_memory_with_codec(Config::new().bucket("notes")).unwrap();

        db.write_tx(|txn| {
            txn.require_bucket::<Vec<String>>("notes")?
                .insert(int_to_key(1u32), &vec!["a".to_string(), "b".to_string()])
        })
        .unwrap();

        db.read_tx(|txn| {
            txn.require_bucket::<Vec<String>>("notes")?
                .for_each_raw(|_, raw| {
                    assert_eq!(raw, br#"["a","b"]"#);
                    Ok(())
                })
        })
        .unwrap();
    }

    #[test]
    fn debug_output() {
        let db = create_db();
        let text = format!("{db:?}");
        assert!(text.contains("is_open: true"));
        assert!(text.contains("cbor"));
    }
}

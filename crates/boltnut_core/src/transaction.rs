//! Transaction handles.
//!
//! A [`Transaction`] wraps one engine transaction, read-only or read-write,
//! for the duration of a [`crate::Database::read_tx`] or
//! [`crate::Database::write_tx`] closure. Buckets resolved from it borrow
//! it, so they cannot escape the closure.

use crate::bucket::{definition, validate_bucket_name, Bucket, RawTable};
use crate::error::{CoreError, CoreResult};
use boltnut_codec::{Cbor, ValueCodec};
use redb::{ReadTransaction, TableError, TableHandle, WriteTransaction};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, warn};

/// Engine transaction behind a [`Transaction`].
enum TxnKind {
    Read(ReadTransaction),
    Write(WriteTransaction),
}

/// A read-only or read-write transaction.
///
/// Read-only transactions see a consistent snapshot taken when they began;
/// commits made by writers afterwards stay invisible to them. At most one
/// read-write transaction is live at a time per database.
pub struct Transaction<C: ValueCodec = Cbor> {
    kind: TxnKind,
    _codec: PhantomData<fn() -> C>,
}

impl<C: ValueCodec> Transaction<C> {
    pub(crate) fn read(txn: ReadTransaction) -> Self {
        Self {
            kind: TxnKind::Read(txn),
            _codec: PhantomData,
        }
    }

    pub(crate) fn write(txn: WriteTransaction) -> Self {
        Self {
            kind: TxnKind::Write(txn),
            _codec: PhantomData,
        }
    }

    /// Returns true for a read-write transaction.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        matches!(self.kind, TxnKind::Write(_))
    }

    /// Resolves the bucket `name` as a view over values of type `V`.
    ///
    /// Returns `Ok(None)` if no such bucket exists. Within a read-write
    /// transaction a bucket can be held by only one view at a time; resolving
    /// it again while the first view is alive fails with an engine error.
    pub fn bucket<V>(&self, name: &str) -> CoreResult<Option<Bucket<'_, V, C>>>
    where
        V: Serialize + DeserializeOwned,
    {
        match &self.kind {
            TxnKind::Read(txn) => match txn.open_table(definition(name)) {
                Ok(table) => Ok(Some(Bucket::new(name, RawTable::ReadOnly(table)))),
                Err(TableError::TableDoesNotExist(_)) => Ok(None),
                Err(e) => Err(e.into()),
            },
            TxnKind::Write(txn) => {
                // Opening a table for writing creates it, so check first.
                if !self.has_bucket(name)? {
                    return Ok(None);
                }
                let table = txn.open_table(definition(name))?;
                Ok(Some(Bucket::new(name, RawTable::ReadWrite(table))))
            }
        }
    }

    /// Like [`Transaction::bucket`], but a missing bucket is an error.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::BucketNotFound`] if no such bucket exists.
    pub fn require_bucket<V>(&self, name: &str) -> CoreResult<Bucket<'_, V, C>>
    where
        V: Serialize + DeserializeOwned,
    {
        self.bucket(name)?
            .ok_or_else(|| CoreError::bucket_not_found(name))
    }

    /// Checks if the bucket `name` exists in this transaction's view.
    pub fn has_bucket(&self, name: &str) -> CoreResult<bool> {
        Ok(self.bucket_names()?.iter().any(|n| n == name))
    }

    /// Returns the names of all buckets, sorted.
    pub fn bucket_names(&self) -> CoreResult<Vec<String>> {
        let mut names: Vec<String> = match &self.kind {
            TxnKind::Read(txn) => txn.list_tables()?.map(|t| t.name().to_string()).collect(),
            TxnKind::Write(txn) => txn.list_tables()?.map(|t| t.name().to_string()).collect(),
        };
        names.sort();
        Ok(names)
    }

    /// Creates the bucket `name`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidBucketName`] if the name is empty or too long
    /// - [`CoreError::ReadOnly`] inside a read-only transaction
    /// - [`CoreError::BucketExists`] if the bucket already exists
    pub fn create_bucket(&self, name: &str) -> CoreResult<()> {
        validate_bucket_name(name)?;
        let txn = self.writer(name)?;
        if self.has_bucket(name)? {
            return Err(CoreError::bucket_exists(name));
        }
        txn.open_table(definition(name))?;
        debug!(bucket = name, "created bucket");
        Ok(())
    }

    /// Creates the bucket `name` unless it already exists.
    ///
    /// Returns true if the bucket was created.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidBucketName`] if the name is empty or too long
    /// - [`CoreError::ReadOnly`] inside a read-only transaction
    pub fn create_bucket_if_missing(&self, name: &str) -> CoreResult<bool> {
        validate_bucket_name(name)?;
        let txn = self.writer(name)?;
        if self.has_bucket(name)? {
            return Ok(false);
        }
        txn.open_table(definition(name))?;
        debug!(bucket = name, "created bucket");
        Ok(true)
    }

    fn writer(&self, bucket: &str) -> CoreResult<&WriteTransaction> {
        match &self.kind {
            TxnKind::Write(txn) => Ok(txn),
            TxnKind::Read(_) => Err(CoreError::read_only(bucket)),
        }
    }

    /// Commits a read-write transaction; a read-only one is simply released.
    pub(crate) fn commit(self) -> CoreResult<()> {
        match self.kind {
            TxnKind::Write(txn) => txn.commit()?,
            TxnKind::Read(txn) => drop(txn),
        }
        Ok(())
    }

    /// Discards every change made in this transaction.
    pub(crate) fn rollback(self) {
        if let TxnKind::Write(txn) = self.kind {
            if let Err(e) = txn.abort() {
                warn!(error = %e, "failed to abort write transaction");
            }
        }
    }
}

impl<C: ValueCodec> fmt::Debug for Transaction<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("writable", &self.is_writable())
            .field("codec", &C::NAME)
            .finish_non_exhaustive()
    }
}

//! Typed bucket implementation.

use crate::error::{CoreError, CoreResult};
use boltnut_codec::{decode_slot, Cbor, ValueCodec};
use redb::{ReadOnlyTable, ReadableTable, Table, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;

type RawKey = &'static [u8];
type RawValue = &'static [u8];

/// Table definition for a bucket: raw byte keys to encoded value bytes.
pub(crate) fn definition(name: &str) -> TableDefinition<'_, RawKey, RawValue> {
    TableDefinition::new(name)
}

/// The engine table behind a bucket, as opened by its transaction.
pub(crate) enum RawTable<'txn> {
    /// Opened from a read-only transaction.
    ReadOnly(ReadOnlyTable<RawKey, RawValue>),
    /// Opened from a read-write transaction.
    ReadWrite(Table<'txn, RawKey, RawValue>),
}

/// A typed view over one bucket.
///
/// `Bucket<V>` binds a named partition of raw byte keys to values of type
/// `V`. Values cross the byte boundary through the codec `C` (CBOR unless
/// the database was opened with another codec); keys are used as given and
/// iterate in bytewise order.
///
/// A bucket is obtained from [`crate::Transaction::bucket`] and borrows that
/// transaction, so it can never outlive it. Decoded values are owned and may
/// be kept after the transaction ends.
///
/// # Example
///
/// ```rust,ignore
/// use boltnut_core::{int_to_key, Database};
///
/// db.write_tx(|txn| {
///     let mut users = txn.require_bucket::<User>("users")?;
///     users.insert(int_to_key(1u64), &User { name: "Ann".into() })?;
///     Ok(())
/// })?;
///
/// let ann = db.read_tx(|txn| txn.require_bucket::<User>("users")?.get(int_to_key(1u64)))?;
/// ```
pub struct Bucket<'txn, V, C: ValueCodec = Cbor> {
    /// Bucket name, kept for error reporting.
    name: String,
    /// Engine table.
    table: RawTable<'txn>,
    /// Type marker.
    _marker: PhantomData<fn() -> (V, C)>,
}

impl<'txn, V, C> Bucket<'txn, V, C>
where
    V: Serialize + DeserializeOwned,
    C: ValueCodec,
{
    pub(crate) fn new(name: impl Into<String>, table: RawTable<'txn>) -> Self {
        Self {
            name: name.into(),
            table,
            _marker: PhantomData,
        }
    }

    /// Returns the bucket name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if this view belongs to a read-write transaction.
    pub fn is_writable(&self) -> bool {
        matches!(self.table, RawTable::ReadWrite(_))
    }

    /// Loads and decodes the value stored under `key`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::KeyNotFound`] if the key is absent
    /// - [`CoreError::Codec`] if the stored bytes cannot be decoded as `V`
    pub fn get(&self, key: impl AsRef<[u8]>) -> CoreResult<V> {
        let key = key.as_ref();
        match &self.table {
            RawTable::ReadOnly(table) => read_slot::<C, V, _>(table, &self.name, key),
            RawTable::ReadWrite(table) => read_slot::<C, V, _>(table, &self.name, key),
        }
    }

    /// Checks if `key` is present.
    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> CoreResult<bool> {
        let key = key.as_ref();
        let present = match &self.table {
            RawTable::ReadOnly(table) => table.get(key)?.is_some(),
            RawTable::ReadWrite(table) => table.get(key)?.is_some(),
        };
        Ok(present)
    }

    /// Encodes `value` and stores it under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Codec`] if `value` cannot be encoded
    /// - [`CoreError::ReadOnly`] inside a read-only transaction
    pub fn insert(&mut self, key: impl AsRef<[u8]>, value: &V) -> CoreResult<()> {
        let bytes = C::encode(value)?;
        self.writable()?.insert(key.as_ref(), bytes.as_slice())?;
        Ok(())
    }

    /// Replaces the value under an existing `key`.
    ///
    /// Unlike [`Bucket::insert`], a missing key is reported and nothing is
    /// written.
    ///
    /// # Errors
    ///
    /// - [`CoreError::KeyNotFound`] if the key is absent
    /// - anything [`Bucket::insert`] can return
    pub fn update(&mut self, key: impl AsRef<[u8]>, value: &V) -> CoreResult<()> {
        let key = key.as_ref();
        if !self.contains_key(key)? {
            return Err(CoreError::key_not_found(&self.name, key));
        }
        self.insert(key, value)
    }

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ReadOnly`] inside a read-only transaction.
    pub fn delete(&mut self, key: impl AsRef<[u8]>) -> CoreResult<()> {
        self.writable()?.remove(key.as_ref())?;
        Ok(())
    }

    /// Visits every pair in ascending key order, decoding each value.
    ///
    /// Stops at the first decoding error or the first error returned by `f`.
    /// The bucket cannot be modified while the scan runs: `f` only gets
    /// shared access.
    pub fn for_each<F>(&self, mut f: F) -> CoreResult<()>
    where
        F: FnMut(&[u8], V) -> CoreResult<()>,
    {
        self.for_each_raw(|key, raw| f(key, C::decode(raw)?))
    }

    /// Visits every pair in ascending key order without decoding.
    pub fn for_each_raw<F>(&self, f: F) -> CoreResult<()>
    where
        F: FnMut(&[u8], &[u8]) -> CoreResult<()>,
    {
        match &self.table {
            RawTable::ReadOnly(table) => scan(table, f),
            RawTable::ReadWrite(table) => scan(table, f),
        }
    }

    /// Counts the pairs in the bucket.
    ///
    /// **Warning**: This performs a full scan.
    pub fn len(&self) -> CoreResult<u64> {
        let mut count = 0;
        self.for_each_raw(|_, _| {
            count += 1;
            Ok(())
        })?;
        Ok(count)
    }

    /// Returns true if the bucket holds no pairs.
    pub fn is_empty(&self) -> CoreResult<bool> {
        let empty = match &self.table {
            RawTable::ReadOnly(table) => table.first()?.is_none(),
            RawTable::ReadWrite(table) => table.first()?.is_none(),
        };
        Ok(empty)
    }

    fn writable(&mut self) -> CoreResult<&mut Table<'txn, RawKey, RawValue>> {
        match &mut self.table {
            RawTable::ReadWrite(table) => Ok(table),
            RawTable::ReadOnly(_) => Err(CoreError::read_only(&self.name)),
        }
    }
}

impl<V, C: ValueCodec> fmt::Debug for Bucket<'_, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bucket")
            .field("name", &self.name)
            .field("writable", &matches!(self.table, RawTable::ReadWrite(_)))
            .field("codec", &C::NAME)
            .finish_non_exhaustive()
    }
}

fn read_slot<C, V, T>(table: &T, bucket: &str, key: &[u8]) -> CoreResult<V>
where
    C: ValueCodec,
    V: DeserializeOwned,
    T: ReadableTable<RawKey, RawValue>,
{
    let guard = table.get(key)?;
    let slot = guard.as_ref().map(|g| g.value());
    decode_slot::<C, V>(slot).map_err(|e| CoreError::from_slot(e, bucket, key))
}

fn scan<T, F>(table: &T, mut f: F) -> CoreResult<()>
where
    T: ReadableTable<RawKey, RawValue>,
    F: FnMut(&[u8], &[u8]) -> CoreResult<()>,
{
    for entry in table.iter()? {
        let (key, value) = entry?;
        f(key.value(), value.value())?;
    }
    Ok(())
}

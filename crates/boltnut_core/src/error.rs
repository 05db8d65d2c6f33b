//! Error types for boltnut core.

use boltnut_codec::CodecError;
use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in boltnut core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage engine error not covered by a more specific variant.
    #[error("storage engine error: {0}")]
    Engine(#[from] redb::Error),

    /// Value codec error.
    ///
    /// `EncodingFailed` means the value could not be serialized;
    /// `DecodingFailed` means stored bytes are corrupt or were written with
    /// a different type.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Key not present in the bucket.
    #[error("key not found: {key:02x?} in bucket {bucket}")]
    KeyNotFound {
        /// The bucket searched.
        bucket: String,
        /// The key that was not found.
        key: Vec<u8>,
    },

    /// Bucket does not exist.
    #[error("bucket not found: {name}")]
    BucketNotFound {
        /// Name of the bucket.
        name: String,
    },

    /// Bucket already exists.
    #[error("bucket already exists: {name}")]
    BucketExists {
        /// Name of the bucket.
        name: String,
    },

    /// Bucket name is empty or too long.
    #[error("invalid bucket name {name:?}: {reason}")]
    InvalidBucketName {
        /// The rejected name.
        name: String,
        /// Why the name was rejected.
        reason: &'static str,
    },

    /// A bucket listed for provisioning could not be created.
    ///
    /// The provisioning transaction is rolled back as a whole.
    #[error("bucket at index {index} ({name}): {source}")]
    BucketProvision {
        /// Position of the failing name in the provisioning list.
        index: usize,
        /// The failing name.
        name: String,
        /// Underlying cause.
        #[source]
        source: Box<CoreError>,
    },

    /// Mutation attempted through a read-only transaction.
    #[error("bucket {bucket} is read-only in this transaction")]
    ReadOnly {
        /// The bucket that was written to.
        bucket: String,
    },

    /// Database file is locked by another handle.
    #[error("database locked: another handle has exclusive access")]
    DatabaseLocked,

    /// Database is closed.
    #[error("database is closed")]
    DatabaseClosed,
}

impl CoreError {
    /// Creates a key not found error.
    pub fn key_not_found(bucket: impl Into<String>, key: &[u8]) -> Self {
        Self::KeyNotFound {
            bucket: bucket.into(),
            key: key.to_vec(),
        }
    }

    /// Creates a bucket not found error.
    pub fn bucket_not_found(name: impl Into<String>) -> Self {
        Self::BucketNotFound { name: name.into() }
    }

    /// Creates a bucket exists error.
    pub fn bucket_exists(name: impl Into<String>) -> Self {
        Self::BucketExists { name: name.into() }
    }

    /// Creates an invalid bucket name error.
    pub fn invalid_bucket_name(name: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidBucketName {
            name: name.into(),
            reason,
        }
    }

    /// Creates a read-only error.
    pub fn read_only(bucket: impl Into<String>) -> Self {
        Self::ReadOnly {
            bucket: bucket.into(),
        }
    }

    /// Maps a codec error raised while reading `key` from `bucket`.
    ///
    /// An absent slot becomes [`CoreError::KeyNotFound`]; everything else is
    /// passed through as [`CoreError::Codec`].
    pub(crate) fn from_slot(error: CodecError, bucket: &str, key: &[u8]) -> Self {
        match error {
            CodecError::Absent => Self::key_not_found(bucket, key),
            other => Self::Codec(other),
        }
    }

    /// Returns true if this is a missing key.
    ///
    /// Misses are ordinary control flow for `get` and `update`.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound { .. })
    }

    /// Returns true if this is a codec encoding failure.
    #[must_use]
    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::Codec(CodecError::EncodingFailed { .. }))
    }

    /// Returns true if this is a codec decoding failure.
    #[must_use]
    pub fn is_decoding(&self) -> bool {
        matches!(self, Self::Codec(CodecError::DecodingFailed { .. }))
    }
}

impl From<redb::DatabaseError> for CoreError {
    fn from(error: redb::DatabaseError) -> Self {
        match error {
            redb::DatabaseError::DatabaseAlreadyOpen => Self::DatabaseLocked,
            other => Self::Engine(other.into()),
        }
    }
}

impl From<redb::TransactionError> for CoreError {
    fn from(error: redb::TransactionError) -> Self {
        Self::Engine(error.into())
    }
}

impl From<redb::TableError> for CoreError {
    fn from(error: redb::TableError) -> Self {
        Self::Engine(error.into())
    }
}

impl From<redb::StorageError> for CoreError {
    fn from(error: redb::StorageError) -> Self {
        Self::Engine(error.into())
    }
}

impl From<redb::CommitError> for CoreError {
    fn from(error: redb::CommitError) -> Self {
        Self::Engine(error.into())
    }
}

//! Typed bucket API.
//!
//! Provides [`Bucket<V>`], a transaction-scoped view over one named
//! partition that encodes and decodes values of type `V` through a
//! [`boltnut_codec::ValueCodec`].

mod typed;

pub use typed::Bucket;
pub(crate) use typed::{definition, RawTable};

use crate::error::{CoreError, CoreResult};

/// Longest accepted bucket name, in bytes.
pub const MAX_BUCKET_NAME_LEN: usize = 32 * 1024;

/// Checks that `name` can be used as a bucket name.
///
/// # Errors
///
/// Returns [`CoreError::InvalidBucketName`] if the name is empty or longer
/// than [`MAX_BUCKET_NAME_LEN`] bytes.
pub fn validate_bucket_name(name: &str) -> CoreResult<()> {
    if name.is_empty() {
        return Err(CoreError::invalid_bucket_name(name, "name is empty"));
    }
    if name.len() > MAX_BUCKET_NAME_LEN {
        return Err(CoreError::invalid_bucket_name(
            truncate_for_display(name),
            "name is too long",
        ));
    }
    Ok(())
}

fn truncate_for_display(name: &str) -> String {
    let mut end = 64.min(name.len());
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &name[..end])
}

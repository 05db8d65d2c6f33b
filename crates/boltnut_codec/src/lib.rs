//! # boltnut Codec
//!
//! Value codecs for boltnut buckets.
//!
//! A codec turns any `serde`-serializable value into a self-describing byte
//! sequence and back. Buckets never look inside those bytes; they only move
//! them between the codec and the storage engine.
//!
//! ## Guarantees
//!
//! - `decode(encode(v))` reproduces `v`, nested structures included
//! - Encoding is pure and stateless; codecs are safe to use from any thread
//! - An empty slot decodes to [`CodecError::Absent`], never to a value, so a
//!   missing key is distinguishable from corrupt data through one entry point
//!
//! ## Usage
//!
//! ```
//! use boltnut_codec::{Cbor, ValueCodec};
//!
//! let bytes = Cbor::encode(&("Ann", 41u8)).unwrap();
//! let decoded: (String, u8) = Cbor::decode(&bytes).unwrap();
//! assert_eq!(decoded, ("Ann".to_string(), 41));
//! ```

mod cbor;
mod error;
mod json;

pub use cbor::Cbor;
pub use error::{CodecError, CodecResult};
pub use json::Json;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// An encode/decode pair for stored values.
///
/// Implementors are stateless marker types; the database, transactions and
/// buckets are generic over one of them, so switching formats never touches
/// bucket logic.
pub trait ValueCodec: Send + Sync + 'static {
    /// Short format name, used in diagnostics.
    const NAME: &'static str;

    /// Serializes `value` into a self-describing byte sequence.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EncodingFailed`] if the value contains
    /// something the format cannot represent.
    fn encode<T: Serialize + ?Sized>(value: &T) -> CodecResult<Vec<u8>>;

    /// Reconstructs a value of type `T` from `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::DecodingFailed`] if the bytes are malformed,
    /// truncated, or structurally incompatible with `T`.
    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> CodecResult<T>;
}

/// Decodes a stored slot that may be empty.
///
/// `None` and an empty slice are the absent sentinel and yield
/// [`CodecError::Absent`]; anything else is handed to `C::decode`. No codec
/// in this crate ever produces an empty encoding.
///
/// # Errors
///
/// Returns [`CodecError::Absent`] for an empty slot, or whatever `C::decode`
/// returns for present bytes.
pub fn decode_slot<C: ValueCodec, T: DeserializeOwned>(slot: Option<&[u8]>) -> CodecResult<T> {
    match slot {
        None | Some([]) => Err(CodecError::Absent),
        Some(bytes) => C::decode(bytes),
    }
}

//! CBOR codec backed by `ciborium`.

use crate::error::{CodecError, CodecResult};
use crate::ValueCodec;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Self-describing CBOR encoding.
///
/// Struct fields are written by name, so a stored value can be decoded
/// without any schema other than the target type. This is the default codec
/// for every bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cbor;

impl ValueCodec for Cbor {
    const NAME: &'static str = "cbor";

    fn encode<T: Serialize + ?Sized>(value: &T) -> CodecResult<Vec<u8>> {
        let mut buffer = Vec::new();
        ciborium::into_writer(value, &mut buffer)
            .map_err(|e| CodecError::encoding_failed(e.to_string()))?;
        Ok(buffer)
    }

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> CodecResult<T> {
        ciborium::from_reader(bytes).map_err(|e| CodecError::decoding_failed(e.to_string()))
    }
}

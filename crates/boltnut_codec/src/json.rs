//! JSON codec backed by `serde_json`.

use crate::error::{CodecError, CodecResult};
use crate::ValueCodec;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Self-describing JSON encoding.
///
/// Larger than [`crate::Cbor`] but readable with any text tool, which helps
/// when inspecting a database by hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Json;

impl ValueCodec for Json {
    const NAME: &'static str = "json";

    fn encode<T: Serialize + ?Sized>(value: &T) -> CodecResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| CodecError::encoding_failed(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> CodecResult<T> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::decoding_failed(e.to_string()))
    }
}

//! Dump command implementation.

use super::open_existing;
use boltnut_codec::{Cbor, ValueCodec};
use boltnut_core::{CoreResult, Database};
use std::path::Path;
use tracing::info;

/// Longest value preview printed per line.
const PREVIEW_LIMIT: usize = 120;

/// One printed line of a dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpLine {
    /// Key as lowercase hex.
    pub key: String,
    /// Encoded value size in bytes.
    pub size: usize,
    /// Decoded preview, or `None` if the value is not CBOR.
    pub preview: Option<String>,
}

/// Runs the dump command.
pub fn run(path: &Path, bucket: &str, limit: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    info!("Dumping bucket {:?} of {:?}", bucket, path);

    let db = open_existing(path)?;
    for line in collect(&db, bucket, limit)? {
        match line.preview {
            Some(preview) => println!("{}  {:>6}  {}", line.key, line.size, preview),
            None => println!("{}  {:>6}  <undecodable>", line.key, line.size),
        }
    }
    Ok(())
}

/// Reads up to `limit` pairs of `bucket` in key order.
pub fn collect(db: &Database, bucket: &str, limit: Option<usize>) -> CoreResult<Vec<DumpLine>> {
    let limit = limit.unwrap_or(usize::MAX);
    db.read_tx(|txn| {
        let mut lines = Vec::new();
        let source = txn.require_bucket::<ciborium::Value>(bucket)?;
        // Iteration has no early exit, so skip the tail instead.
        source.for_each_raw(|key, value| {
            if lines.len() < limit {
                lines.push(DumpLine {
                    key: to_hex(key),
                    size: value.len(),
                    preview: preview(value),
                });
            }
            Ok(())
        })?;
        Ok(lines)
    })
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn preview(raw: &[u8]) -> Option<String> {
    let value: ciborium::Value = Cbor::decode(raw).ok()?;
    let mut text = serde_json::to_string(&value).unwrap_or_else(|_| format!("{value:?}"));
    if text.len() > PREVIEW_LIMIT {
        let mut end = PREVIEW_LIMIT;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
        text.push_str("...");
    }
    Some(text)
}

//! Inspect command implementation.

use super::open_existing;
use boltnut_core::{CoreResult, Database};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Database inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Database path.
    pub path: String,
    /// File size in bytes.
    pub file_size: u64,
    /// Number of buckets.
    pub bucket_count: usize,
    /// Per-bucket statistics, sorted by name.
    pub buckets: Vec<BucketStats>,
}

/// Statistics for a single bucket.
#[derive(Debug, Serialize)]
pub struct BucketStats {
    /// Bucket name.
    pub name: String,
    /// Number of keys.
    pub key_count: u64,
    /// Total size of keys in bytes.
    pub key_bytes: usize,
    /// Total size of encoded values in bytes.
    pub value_bytes: usize,
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    info!("Inspecting {:?}", path);

    let file_size = std::fs::metadata(path)?.len();
    let db = open_existing(path)?;
    let buckets = collect_stats(&db)?;

    let result = InspectResult {
        path: path.display().to_string(),
        file_size,
        bucket_count: buckets.len(),
        buckets,
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        "text" => print_text(&result),
        other => return Err(format!("Unknown format: {other}").into()),
    }

    Ok(())
}

/// Scans every bucket and gathers its statistics.
pub fn collect_stats(db: &Database) -> CoreResult<Vec<BucketStats>> {
    db.read_tx(|txn| {
        let mut stats = Vec::new();
        for name in txn.bucket_names()? {
            let bucket = txn.require_bucket::<ciborium::Value>(&name)?;
            let mut entry = BucketStats {
                name: name.clone(),
                key_count: 0,
                key_bytes: 0,
                value_bytes: 0,
            };
            bucket.for_each_raw(|key, value| {
                entry.key_count += 1;
                entry.key_bytes += key.len();
                entry.value_bytes += value.len();
                Ok(())
            })?;
            stats.push(entry);
        }
        Ok(stats)
    })
}

fn print_text(result: &InspectResult) {
    println!("Database: {}", result.path);
    println!("File size: {} bytes", result.file_size);
    println!("Buckets: {}", result.bucket_count);
    for bucket in &result.buckets {
        println!(
            "  {:<24} {:>8} keys {:>10} key bytes {:>12} value bytes",
            bucket.name, bucket.key_count, bucket.key_bytes, bucket.value_bytes
        );
    }
}

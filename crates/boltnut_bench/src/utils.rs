//! Benchmark utilities.

use boltnut_core::int_to_key;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Record stored by the bucket benchmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Sequence number.
    pub id: u64,
    /// Short label.
    pub label: String,
    /// Opaque payload.
    pub payload: Vec<u8>,
}

/// Generate random bytes of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Generate a random alphanumeric string.
pub fn random_label(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate `count` records with keys and a payload of `payload_size` bytes.
pub fn generate_records(count: usize, payload_size: usize) -> Vec<([u8; 8], Record)> {
    (0..count as u64)
        .map(|id| {
            let record = Record {
                id,
                label: random_label(12),
                payload: random_data(payload_size),
            };
            (int_to_key(id), record)
        })
        .collect()
}

//! CLI command implementations.

pub mod buckets;
pub mod dump;
pub mod inspect;

use boltnut_core::{Config, Database};
use std::path::Path;

/// Opens an existing database file without provisioning any bucket.
pub fn open_existing(path: &Path) -> Result<Database, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("No database found at {:?}", path).into());
    }
    Ok(Database::open_with_config(
        path,
        Config::new().create_if_missing(false),
    )?)
}

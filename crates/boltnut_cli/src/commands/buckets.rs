//! Bucket listing and creation commands.

use super::open_existing;
use boltnut_core::Database;
use std::path::Path;
use tracing::info;

/// Prints the name of every bucket, one per line.
pub fn list(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_existing(path)?;
    for name in db.bucket_names()? {
        println!("{name}");
    }
    Ok(())
}

/// Creates a bucket, creating the database file if needed.
pub fn create(path: &Path, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    info!("Creating bucket {:?} in {:?}", name, path);

    let db = Database::open(path, &[])?;
    db.create_bucket(name)?;
    db.close()?;

    println!("Created bucket {name}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn create_then_list() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("app.db");

        create(&path, "users").unwrap();
        assert!(create(&path, "users").is_err());
        assert!(create(&path, "").is_err());

        let db = open_existing(&path).unwrap();
        assert_eq!(db.bucket_names().unwrap(), vec!["users".to_string()]);
    }

    #[test]
    fn list_requires_existing_file() {
        let temp = tempdir().unwrap();
        assert!(list(&temp.path().join("nope.db")).is_err());
    }
}

//! End-to-end behaviour of databases, transactions and buckets on disk.

use boltnut_core::{int_to_key, CoreError, Database};
use serde::{Deserialize, Serialize};
use std::sync::mpsc;
use std::thread;
use tempfile::tempdir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct User {
    name: String,
}

fn ann() -> User {
    User {
        name: "Ann".to_string(),
    }
}

#[test]
fn insert_then_read_back() {
    let temp = tempdir().unwrap();
    let db = Database::open(temp.path().join("app.db"), &["users"]).unwrap();

    db.write_tx(|txn| {
        txn.require_bucket::<User>("users")?
            .insert(int_to_key(1u64), &ann())
    })
    .unwrap();

    let found = db
        .read_tx(|txn| txn.require_bucket::<User>("users")?.get(int_to_key(1u64)))
        .unwrap();
    assert_eq!(found, ann());
}

#[test]
fn update_vs_insert() {
    let temp = tempdir().unwrap();
    let db = Database::open(temp.path().join("app.db"), &["users"]).unwrap();
    let key = int_to_key(7u64);

    let result = db.write_tx(|txn| txn.require_bucket::<User>("users")?.update(key, &ann()));
    assert!(result.unwrap_err().is_not_found());
    assert!(db
        .read_tx(|txn| txn.require_bucket::<User>("users")?.is_empty())
        .unwrap());

    db.write_tx(|txn| txn.require_bucket::<User>("users")?.insert(key, &ann()))
        .unwrap();
    let bob = User {
        name: "Bob".to_string(),
    };
    db.write_tx(|txn| txn.require_bucket::<User>("users")?.insert(key, &bob))
        .unwrap();

    let found = db
        .read_tx(|txn| txn.require_bucket::<User>("users")?.get(key))
        .unwrap();
    assert_eq!(found, bob);
}

#[test]
fn snapshot_isolation() {
    let temp = tempdir().unwrap();
    let db = Database::open(temp.path().join("app.db"), &["users"]).unwrap();
    let key = int_to_key(1u64);

    db.read_tx(|txn| {
        let users = txn.require_bucket::<User>("users")?;
        assert!(users.get(key).unwrap_err().is_not_found());

        thread::scope(|s| {
            s.spawn(|| db.write_tx(|w| w.require_bucket::<User>("users")?.insert(key, &ann())))
                .join()
                .expect("writer panicked")
        })?;

        // The writer has committed, but this snapshot predates it.
        assert!(users.get(key).unwrap_err().is_not_found());
        assert!(txn
            .require_bucket::<User>("users")?
            .get(key)
            .unwrap_err()
            .is_not_found());
        Ok(())
    })
    .unwrap();

    let found = db
        .read_tx(|txn| txn.require_bucket::<User>("users")?.get(key))
        .unwrap();
    assert_eq!(found, ann());
}

#[test]
fn readers_do_not_see_uncommitted_writes() {
    let temp = tempdir().unwrap();
    let db = Database::open(temp.path().join("app.db"), &["users"]).unwrap();
    let key = int_to_key(2u64);

    let (written_tx, written_rx) = mpsc::channel();
    let (checked_tx, checked_rx) = mpsc::channel();
    let db = &db;

    thread::scope(|s| {
        s.spawn(move || {
            db.write_tx(|txn| {
                txn.require_bucket::<User>("users")?.insert(key, &ann())?;
                written_tx.send(()).unwrap();
                checked_rx.recv().unwrap();
                Ok(())
            })
            .unwrap();
        });

        written_rx.recv().unwrap();
        let seen = db
            .read_tx(|txn| txn.require_bucket::<User>("users")?.contains_key(key))
            .unwrap();
        assert!(!seen);
        checked_tx.send(()).unwrap();
    });

    assert!(db
        .read_tx(|txn| txn.require_bucket::<User>("users")?.contains_key(key))
        .unwrap());
}

#[test]
fn provisioning_is_idempotent() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("app.db");

    {
        let db = Database::open(&path, &["users", "posts"]).unwrap();
        db.write_tx(|txn| txn.require_bucket::<User>("users")?.insert(b"ann", &ann()))
            .unwrap();
    }

    let db = Database::open(&path, &["users", "posts"]).unwrap();
    assert_eq!(
        db.bucket_names().unwrap(),
        vec!["posts".to_string(), "users".to_string()]
    );
    let found = db
        .read_tx(|txn| txn.require_bucket::<User>("users")?.get(b"ann"))
        .unwrap();
    assert_eq!(found, ann());
}

#[test]
fn failed_provisioning_leaves_no_buckets() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("app.db");

    let result = Database::open(&path, &["users", ""]);
    assert!(matches!(
        result,
        Err(CoreError::BucketProvision { index: 1, .. })
    ));

    let db = Database::open(&path, &[]).unwrap();
    assert!(db.bucket_names().unwrap().is_empty());
}

#[test]
fn second_handle_is_locked_out() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("app.db");

    let first = Database::open(&path, &["users"]).unwrap();
    let second = Database::open(&path, &["users"]);
    assert!(matches!(second, Err(CoreError::DatabaseLocked)));

    first.close().unwrap();
    let third = Database::open(&path, &["users"]);
    assert!(third.is_ok());
}

#[test]
fn decoded_values_outlive_the_transaction() {
    let temp = tempdir().unwrap();
    let db = Database::open(temp.path().join("app.db"), &["users"]).unwrap();

    db.write_tx(|txn| {
        let mut users = txn.require_bucket::<User>("users")?;
        for i in 0..10u64 {
            users.insert(
                int_to_key(i),
                &User {
                    name: format!("user-{i}"),
                },
            )?;
        }
        Ok(())
    })
    .unwrap();

    let collected = db
        .read_tx(|txn| {
            let mut out = Vec::new();
            txn.require_bucket::<User>("users")?.for_each(|key, user| {
                out.push((key.to_vec(), user));
                Ok(())
            })?;
            Ok(out)
        })
        .unwrap();
    db.close().unwrap();

    assert_eq!(collected.len(), 10);
    assert_eq!(collected[0].1.name, "user-0");
}

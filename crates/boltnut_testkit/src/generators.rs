//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random test data
//! that maintains required invariants.

use crate::fixtures::{Address, Person};
use boltnut_core::MAX_BUCKET_NAME_LEN;
use proptest::prelude::*;

/// Strategy for generating valid bucket names.
pub fn bucket_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9_.-]{0,31}").expect("Invalid regex")
}

/// Strategy for generating bucket names the database must reject.
pub fn invalid_bucket_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("x".repeat(MAX_BUCKET_NAME_LEN + 1)),
    ]
}

/// Strategy for generating raw keys (arbitrary bytes, never empty).
pub fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..32)
}

/// Strategy for generating [`Person`] records.
pub fn person_strategy() -> impl Strategy<Value = Person> {
    (
        ".{0,24}",
        any::<u32>(),
        prop::option::of("[a-z]{1,8}@[a-z]{1,8}\\.com"),
        prop::collection::vec("[a-z]{1,10}", 0..5),
        (".{0,24}", ".{0,16}"),
    )
        .prop_map(|(name, age, email, tags, (street, city))| Person {
            name,
            age,
            email,
            tags,
            address: Address { street, city },
        })
}

/// A bucket operation for model-based tests.
#[derive(Debug, Clone)]
pub enum BucketOperation {
    /// Insert (upsert) a value.
    Insert {
        /// Key
        key: Vec<u8>,
        /// Value
        value: Person,
    },
    /// Update an existing value.
    Update {
        /// Key
        key: Vec<u8>,
        /// Value
        value: Person,
    },
    /// Delete a key.
    Delete {
        /// Key
        key: Vec<u8>,
    },
    /// Get a key.
    Get {
        /// Key
        key: Vec<u8>,
    },
}

/// Strategy for generating bucket operations.
///
/// Keys are drawn from a small space so operations collide often.
pub fn bucket_operation_strategy() -> impl Strategy<Value = BucketOperation> {
    let key = prop::collection::vec(0u8..4, 1..3);
    prop_oneof![
        3 => (key.clone(), person_strategy())
            .prop_map(|(key, value)| BucketOperation::Insert { key, value }),
        2 => (key.clone(), person_strategy())
            .prop_map(|(key, value)| BucketOperation::Update { key, value }),
        1 => key.clone().prop_map(|key| BucketOperation::Delete { key }),
        2 => key.prop_map(|key| BucketOperation::Get { key }),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<BucketOperation>> {
    prop::collection::vec(bucket_operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::with_temp_db;
    use boltnut_core::{validate_bucket_name, Cbor, CoreError, ValueCodec};
    use std::collections::BTreeMap;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn generated_bucket_names_are_valid(name in bucket_name_strategy()) {
            prop_assert!(validate_bucket_name(&name).is_ok());
        }

        #[test]
        fn invalid_bucket_names_are_rejected(name in invalid_bucket_name_strategy()) {
            prop_assert!(validate_bucket_name(&name).is_err());
        }

        #[test]
        fn person_roundtrips(person in person_strategy()) {
            let bytes = Cbor::encode(&person).unwrap();
            let decoded: Person = Cbor::decode(&bytes).unwrap();
            prop_assert_eq!(person, decoded);
        }

        #[test]
        fn bucket_matches_btreemap_model(ops in operation_sequence_strategy(1, 40)) {
            with_temp_db(&["people"], |db| {
                let mut model: BTreeMap<Vec<u8>, Person> = BTreeMap::new();

                db.write_tx(|txn| {
                    let mut bucket = txn.require_bucket::<Person>("people")?;
                    for op in &ops {
                        match op {
                            BucketOperation::Insert { key, value } => {
                                bucket.insert(key, value)?;
                                model.insert(key.clone(), value.clone());
                            }
                            BucketOperation::Update { key, value } => {
                                match bucket.update(key, value) {
                                    Ok(()) => {
                                        assert!(model.contains_key(key));
                                        model.insert(key.clone(), value.clone());
                                    }
                                    Err(CoreError::KeyNotFound { .. }) => {
                                        assert!(!model.contains_key(key));
                                    }
                                    Err(e) => return Err(e),
                                }
                            }
                            BucketOperation::Delete { key } => {
                                bucket.delete(key)?;
                                model.remove(key);
                            }
                            BucketOperation::Get { key } => match bucket.get(key) {
                                Ok(found) => assert_eq!(model.get(key), Some(&found)),
                                Err(e) if e.is_not_found() => assert!(!model.contains_key(key)),
                                Err(e) => return Err(e),
                            },
                        }
                    }
                    Ok(())
                })
                .unwrap();

                let mut stored = Vec::new();
                db.read_tx(|txn| {
                    txn.require_bucket::<Person>("people")?.for_each(|key, person| {
                        stored.push((key.to_vec(), person));
                        Ok(())
                    })
                })
                .unwrap();

                let expected: Vec<(Vec<u8>, Person)> = model.into_iter().collect();
                assert_eq!(stored, expected);
            });
        }
    }
}

//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the cache invariants: stats accuracy, round-trip
//! storage, capacity bounds, and key determinism.

use proptest::prelude::*;

use serde_json::json;

use crate::cache::{generate_key, Params, TtlCache};

// == Test Configuration ==
const TEST_MAX_CAPACITY: usize = 100;
const TEST_TTL: u64 = 300;

// == Strategies ==
/// Generates valid cache keys (non-empty, bounded)
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}".prop_map(|s| s)
}

/// Generates simple string payload values
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,64}".prop_map(|s| s)
}

/// Generates parameter names for key generation
fn param_name_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,12}".prop_map(|s| s)
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of operations, hit/miss/set counters reflect exactly
    // the operations that occurred.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut store = TtlCache::new(TEST_MAX_CAPACITY);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;
        let mut expected_sets: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key, json!(value), TEST_TTL);
                    expected_sets += 1;
                }
                CacheOp::Get { key } => {
                    match store.get(&key) {
                        Some(_) => expected_hits += 1,
                        None => expected_misses += 1,
                    }
                }
                CacheOp::Delete { key } => {
                    let _ = store.delete(&key);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.sets, expected_sets, "Sets mismatch");
        prop_assert_eq!(stats.total_entries, store.len(), "Total entries mismatch");
    }

    // For any valid key-value pair, storing then retrieving (before expiry)
    // returns the stored value, and has() reports presence.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = TtlCache::new(TEST_MAX_CAPACITY);

        store.set(key.clone(), json!(value.clone()), TEST_TTL);

        prop_assert!(store.has(&key));
        let retrieved = store.get(&key).expect("value should be present");
        prop_assert_eq!(retrieved, json!(value), "Round-trip value mismatch");
    }

    // For any key in the cache, after delete a subsequent get reports
    // not-found.
    #[test]
    fn prop_delete_removes_entry(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = TtlCache::new(TEST_MAX_CAPACITY);

        store.set(key.clone(), json!(value), TEST_TTL);
        prop_assert!(store.get(&key).is_some(), "Key should exist before delete");

        prop_assert!(store.delete(&key));
        prop_assert!(store.get(&key).is_none(), "Key should not exist after delete");
    }

    // No sequence of inserts leaves the cache above capacity.
    #[test]
    fn prop_capacity_bound(count in 1usize..300) {
        let mut store = TtlCache::new(TEST_MAX_CAPACITY);

        for i in 0..count {
            store.set(format!("key{}", i), json!(i), TEST_TTL);
            prop_assert!(
                store.len() <= TEST_MAX_CAPACITY,
                "cache exceeded capacity after insert {}", i
            );
        }
    }

    // Key generation is stable under parameter insertion order and matches
    // the sorted pair layout.
    #[test]
    fn prop_generate_key_deterministic(
        names in prop::collection::btree_set(param_name_strategy(), 1..6),
        value in valid_value_strategy(),
    ) {
        let params: Params = names
            .iter()
            .map(|name| (name.clone(), Some(value.clone())))
            .collect();

        let key = generate_key("p", &params);

        let expected = format!(
            "p_{}",
            names
                .iter()
                .map(|name| format!("{}={}", name, value.trim().to_lowercase()))
                .collect::<Vec<_>>()
                .join("_")
        );
        prop_assert_eq!(key, expected);
    }
}

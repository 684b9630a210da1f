//! End-to-end checks of the public API.

use bloomgate::prelude::*;
use bloomgate::DEFAULT_SEED;

#[test]
fn test_basic_insert_and_find() {
    let filter = BloomFilter::new(50, 0.01).unwrap();

    filter.insert("google");
    filter.insert("openai");

    assert!(filter.contains("google"), "Should find the item we just added");
    assert!(filter.contains("openai"), "Should find the item we just added");
    assert_eq!(filter.bit_count(), 480);
    assert_eq!(filter.hash_count(), 7);
    assert_eq!(filter.inserted_count(), 2);
}

#[test]
fn test_empty_filter_reports_nothing() {
    let filter = BloomFilter::new(1000, 0.01).unwrap();
    for word in ["", "a", "google", "microsoft"] {
        assert!(!filter.contains(word), "Empty filter reported {:?}", word);
    }
    assert_eq!(filter.popcount(), 0);
    assert_eq!(filter.estimated_false_positive_rate(), 0.0);
}

#[test]
fn test_item_types() {
    let filter = BloomFilter::new(100, 0.01).unwrap();
    filter.insert("str");
    filter.insert(String::from("string"));
    filter.insert(vec![1u8, 2, 3]);
    filter.insert(&[4u8, 5][..]);

    assert!(filter.contains(String::from("str")));
    assert!(filter.contains("string"));
    assert!(filter.contains([1u8, 2, 3]));
    assert!(filter.contains(vec![4u8, 5]));
}

#[test]
fn test_batch_operations() {
    let filter = BloomFilter::new(1000, 0.01).unwrap();
    let items = ["apple", "banana", "cherry"];

    filter.insert_batch(items);

    for item in items {
        assert!(filter.contains(item), "Should find {}", item);
    }
    assert!(filter.contains_all(items));
    assert!(filter.contains_any(["durian", "apple"]));
    assert_eq!(filter.contains_batch(["apple", "cherry"]), vec![true, true]);
}

#[test]
fn test_no_false_negatives() {
    let filter = BloomFilter::new(1000, 0.01).unwrap();

    for i in 0..1000u64 {
        filter.insert(i.to_le_bytes());
    }

    for i in 0..1000u64 {
        assert!(filter.contains(i.to_le_bytes()), "False negative for {}", i);
    }
}

#[test]
fn test_explicit_sizing() {
    let filter: BloomFilter = BloomFilter::explicit(1 << 16, 5).unwrap();
    assert_eq!(filter.bit_count(), 65_536);
    assert!(filter.memory_usage() >= 8192);
    assert_eq!(filter.parameters().expected_items(), 0);
    assert_eq!(filter.load_factor(), None);
}

#[test]
fn test_invalid_parameters() {
    assert!(matches!(
        BloomFilter::new(0, 0.01),
        Err(FilterError::InvalidParameter { .. })
    ));
    assert!(BloomFilter::new(10, 0.0).is_err());
    assert!(BloomFilter::new(10, 1.0).is_err());
    assert!(BloomFilter::explicit(0, 3).is_err());
    assert!(BloomFilter::explicit(10, 0).is_err());
}

#[test]
fn test_union_and_intersection() {
    let a = BloomFilter::new(1000, 0.01).unwrap();
    let b = BloomFilter::new(1000, 0.01).unwrap();
    a.insert("only-a");
    a.insert("both");
    b.insert("only-b");
    b.insert("both");

    let u = a.union(&b).unwrap();
    for item in ["only-a", "only-b", "both"] {
        assert!(u.contains(item));
    }
    assert_eq!(u.inserted_count(), 4);

    let estimate = a.intersection_estimate(&b).unwrap();
    assert!(estimate > 0.0 && estimate < 1.0);

    let other_seed: BloomFilter = BloomFilter::with_seed(1000, 0.01, DEFAULT_SEED ^ 1).unwrap();
    assert!(matches!(
        a.union(&other_seed),
        Err(FilterError::IncompatibleFilter { .. })
    ));
}

#[test]
fn test_persistence_roundtrip() {
    let filter = BloomFilter::new(500, 0.01).unwrap();
    filter.insert("google");
    filter.insert("openai");

    let bytes = filter.serialize();
    let restored: BloomFilter = BloomFilter::deserialize(&bytes).unwrap();

    assert_eq!(restored, filter);
    assert!(restored.contains("google"));
    assert!(restored.contains("openai"));
    assert_eq!(restored.inserted_count(), 2);
    assert_eq!(restored.serialize(), bytes);
}

#[test]
fn test_corrupt_bytes_are_rejected() {
    let filter = BloomFilter::new(500, 0.01).unwrap();
    let bytes = filter.serialize();

    assert!(matches!(
        BloomFilter::<XxHasher>::deserialize(&bytes[..10]),
        Err(FilterError::CorruptData { .. })
    ));
    assert!(BloomFilter::<XxHasher>::deserialize(&bytes[..bytes.len() - 1]).is_err());

    let mut wrong_version = bytes.clone();
    wrong_version[0] = 0;
    assert!(BloomFilter::<XxHasher>::deserialize(&wrong_version).is_err());
}

#[test]
fn test_counting_lifecycle() {
    let filter = CountingBloomFilter::new(1000, 0.01).unwrap();
    filter.insert("session-a");
    filter.insert("session-b");

    assert!(filter.remove("session-a").unwrap());
    assert!(!filter.contains("session-a"));
    assert!(filter.contains("session-b"));
    assert!(!filter.remove("never-inserted").unwrap());

    let restored: CountingBloomFilter = CountingBloomFilter::deserialize(&filter.serialize()).unwrap();
    assert!(restored.contains("session-b"));
    assert_eq!(restored.inserted_count(), 1);
}

#[test]
fn test_default_filters() {
    let filter: BloomFilter = BloomFilter::default();
    assert_eq!(filter.bit_count(), 959);
    assert_eq!(filter.hash_count(), 7);
    assert_eq!(filter.seed(), DEFAULT_SEED);

    let counting: CountingBloomFilter = CountingBloomFilter::default();
    assert_eq!(counting.bit_count(), 959);
}

#[test]
fn test_typed_values() {
    let filter = BloomFilter::new(100, 0.01).unwrap();
    filter.insert_value(&(7u32, "seven")).unwrap();
    assert!(filter.contains_value(&(7u32, "seven")).unwrap());
    assert!(!filter.contains_value(&(8u32, "eight")).unwrap());
}

#[test]
fn test_config_driven_construction() {
    let config: FilterConfig = serde_json::from_str(
        r#"{ "expected_items": 1000, "false_positive_rate": 0.1, "seed": 99 }"#,
    )
    .unwrap();

    let filter = config.build_standard().unwrap();
    assert_eq!(filter.bit_count(), 4793);
    assert_eq!(filter.hash_count(), 3);
    assert_eq!(filter.seed(), 99);
}

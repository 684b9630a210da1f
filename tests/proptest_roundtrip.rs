//! Property tests over arbitrary item sets.

use bloomgate::prelude::*;
use proptest::collection::{hash_set, vec};
use proptest::prelude::*;

fn item_lists() -> impl Strategy<Value = Vec<Vec<u8>>> {
    vec(vec(any::<u8>(), 0..32), 0..200)
}

proptest! {
    #[test]
    fn no_false_negatives(items in item_lists(), seed in any::<u64>()) {
        let filter: BloomFilter = BloomFilter::with_seed(200, 0.01, seed).unwrap();
        for item in &items {
            filter.insert(item);
        }
        for item in &items {
            prop_assert!(filter.contains(item));
        }
    }

    #[test]
    fn serialize_roundtrip(items in item_lists(), seed in any::<u64>()) {
        let filter: BloomFilter = BloomFilter::with_seed(100, 0.05, seed).unwrap();
        for item in &items {
            filter.insert(item);
        }

        let bytes = filter.serialize();
        let restored: BloomFilter = BloomFilter::deserialize(&bytes).unwrap();
        prop_assert_eq!(&restored, &filter);
        prop_assert_eq!(restored.inserted_count(), items.len() as u64);
        prop_assert_eq!(restored.serialize(), bytes);
    }

    #[test]
    fn union_is_superset(left in item_lists(), right in item_lists()) {
        let a = BloomFilter::new(400, 0.01).unwrap();
        let b = BloomFilter::new(400, 0.01).unwrap();
        for item in &left {
            a.insert(item);
        }
        for item in &right {
            b.insert(item);
        }

        let union = a.union(&b).unwrap();
        for item in left.iter().chain(&right) {
            prop_assert!(union.contains(item));
        }
        prop_assert!(union.popcount() >= a.popcount());
        prop_assert!(union.popcount() >= b.popcount());
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in vec(any::<u8>(), 0..256)) {
        let _ = BloomFilter::<XxHasher>::deserialize(&bytes);
        let _ = CountingBloomFilter::<XxHasher>::deserialize(&bytes);
    }

    #[test]
    fn counting_remove_all_restores_empty(items in hash_set(vec(any::<u8>(), 1..16), 0..50)) {
        let filter = CountingBloomFilter::new(100, 0.01).unwrap();
        for item in &items {
            filter.insert(item);
        }
        for item in &items {
            prop_assert!(filter.remove(item).unwrap());
        }

        prop_assert_eq!(filter.nonzero_counters(), 0);
        prop_assert!(filter.is_empty());
    }

    #[test]
    fn counting_roundtrip(items in item_lists()) {
        let filter = CountingBloomFilter::new(300, 0.01).unwrap();
        for item in &items {
            filter.insert(item);
        }

        let restored: CountingBloomFilter =
            CountingBloomFilter::deserialize(&filter.serialize()).unwrap();
        prop_assert_eq!(&restored, &filter);
        for item in &items {
            prop_assert_eq!(restored.count_estimate(item), filter.count_estimate(item));
        }
    }
}

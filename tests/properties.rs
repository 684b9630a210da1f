//! Statistical and algebraic properties of the filters.

use bloomgate::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

fn random_items(rng: &mut StdRng, count: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|_| {
            let len = rng.gen_range(1..=48);
            (0..len).map(|_| rng.gen::<u8>()).collect()
        })
        .collect()
}

#[test]
fn test_false_positive_rate_within_bound() {
    let filter = BloomFilter::new(10_000, 0.01).unwrap();
    for i in 0..10_000u32 {
        filter.insert(format!("member-{}", i));
    }

    let probes = 100_000u32;
    let false_positives = (0..probes)
        .filter(|i| filter.contains(format!("probe-{}", i)))
        .count();
    let rate = false_positives as f64 / f64::from(probes);

    assert!(rate <= 0.02, "false positive rate {} above 0.02", rate);

    let estimate = filter.estimated_false_positive_rate();
    assert!(
        (estimate - 0.01).abs() < 0.005,
        "live estimate {} far from target",
        estimate
    );
}

#[test]
fn test_random_items_have_no_false_negatives() {
    let mut rng = StdRng::seed_from_u64(42);
    let items = random_items(&mut rng, 5_000);

    let filter = BloomFilter::new(5_000, 0.01).unwrap();
    for item in &items {
        filter.insert(item);
    }
    for item in &items {
        assert!(filter.contains(item), "False negative for {:?}", item);
    }
}

#[test]
fn test_union_equals_combined_insertion() {
    let mut rng = StdRng::seed_from_u64(7);
    let left_items = random_items(&mut rng, 800);
    let right_items = random_items(&mut rng, 800);

    let left = BloomFilter::new(2_000, 0.01).unwrap();
    let right = BloomFilter::new(2_000, 0.01).unwrap();
    let combined = BloomFilter::new(2_000, 0.01).unwrap();

    for item in &left_items {
        left.insert(item);
        combined.insert(item);
    }
    for item in &right_items {
        right.insert(item);
        combined.insert(item);
    }

    let union = left.union(&right).unwrap();
    assert_eq!(union, combined);
    assert!(union.popcount() >= left.popcount().max(right.popcount()));
    assert!(union.popcount() <= left.popcount() + right.popcount());

    let mut in_place = left.clone();
    in_place.union_inplace(&right).unwrap();
    assert_eq!(in_place, union);
}

#[test]
fn test_union_is_commutative_and_idempotent() {
    let a = BloomFilter::new(500, 0.01).unwrap();
    let b = BloomFilter::new(500, 0.01).unwrap();
    for i in 0..200u32 {
        a.insert(i.to_le_bytes());
        b.insert((i + 1_000).to_le_bytes());
    }

    assert_eq!(a.union(&b).unwrap(), b.union(&a).unwrap());
    assert_eq!(a.union(&a).unwrap(), a);
}

#[test]
fn test_deterministic_storage() {
    let mut rng = StdRng::seed_from_u64(1);
    let items = random_items(&mut rng, 300);

    let first = BloomFilter::new(1_000, 0.001).unwrap();
    let second = BloomFilter::new(1_000, 0.001).unwrap();
    for item in &items {
        first.insert(item);
    }
    for item in items.iter().rev() {
        second.insert(item);
    }

    assert_eq!(first.serialize(), second.serialize());
}

#[test]
fn test_seed_changes_layout() {
    let a: BloomFilter = BloomFilter::with_seed(1_000, 0.01, 1).unwrap();
    let b: BloomFilter = BloomFilter::with_seed(1_000, 0.01, 2).unwrap();
    a.insert("same");
    b.insert("same");
    assert_ne!(&a.serialize()[29..], &b.serialize()[29..]);
}

#[test]
fn test_roundtrip_preserves_answers() {
    let mut rng = StdRng::seed_from_u64(99);
    let items = random_items(&mut rng, 1_000);
    let probes = random_items(&mut rng, 1_000);

    let filter = BloomFilter::new(1_000, 0.05).unwrap();
    for item in &items {
        filter.insert(item);
    }

    let restored: BloomFilter = BloomFilter::deserialize(&filter.serialize()).unwrap();
    for probe in items.iter().chain(&probes) {
        assert_eq!(restored.contains(probe), filter.contains(probe));
    }
}

#[test]
fn test_cardinality_estimates() {
    let a = BloomFilter::new(2_000, 0.01).unwrap();
    let b = BloomFilter::new(2_000, 0.01).unwrap();
    for i in 0..1_000u32 {
        a.insert(i.to_le_bytes());
    }
    for i in 500..1_500u32 {
        b.insert(i.to_le_bytes());
    }

    let estimate = a.estimated_cardinality();
    assert!((estimate - 1_000.0).abs() < 50.0, "cardinality estimate {}", estimate);

    let overlap = a.estimated_intersection_cardinality(&b).unwrap();
    assert!((overlap - 500.0).abs() < 100.0, "intersection estimate {}", overlap);
}

#[test]
fn test_counting_matches_multiset_model() {
    let mut rng = StdRng::seed_from_u64(2024);
    let pool = random_items(&mut rng, 200);
    let filter = CountingBloomFilter::new(1_000, 0.01).unwrap();
    let mut model: HashMap<usize, u32> = HashMap::new();

    for _ in 0..2_000 {
        let slot = rng.gen_range(0..pool.len());
        let held = model.get(&slot).copied().unwrap_or(0);
        if held > 0 && rng.gen_bool(0.5) {
            assert!(filter.remove(&pool[slot]).unwrap());
            model.insert(slot, held - 1);
        } else if held < 3 {
            filter.insert(&pool[slot]);
            model.insert(slot, held + 1);
        }

        for (&present, &count) in &model {
            if count > 0 {
                assert!(filter.contains(&pool[present]), "False negative for slot {}", present);
            }
        }
    }

    let live: u32 = model.values().sum();
    assert_eq!(filter.inserted_count(), u64::from(live));
}

#[test]
fn test_concurrent_insert_and_query() {
    let filter = Arc::new(BloomFilter::new(40_000, 0.01).unwrap());

    let writers: Vec<_> = (0..4u32)
        .map(|tid| {
            let filter = Arc::clone(&filter);
            thread::spawn(move || {
                for i in 0..10_000u32 {
                    let item = (tid * 10_000 + i).to_le_bytes();
                    filter.insert(item);
                    assert!(filter.contains(item), "insert not visible to its own thread");
                }
            })
        })
        .collect();

    let reader = {
        let filter = Arc::clone(&filter);
        thread::spawn(move || {
            for _ in 0..20 {
                let snapshot = filter.serialize();
                let restored: BloomFilter = BloomFilter::deserialize(&snapshot).unwrap();
                assert!(restored.popcount() <= filter.popcount());
            }
        })
    };

    for handle in writers {
        handle.join().unwrap();
    }
    reader.join().unwrap();

    assert_eq!(filter.inserted_count(), 40_000);
    for i in 0..40_000u32 {
        assert!(filter.contains(i.to_le_bytes()), "False negative for item {}", i);
    }
}

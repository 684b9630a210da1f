//! Bloom filter implementations.
//!
//! # Available Filters
//!
//! - [`BloomFilter`] - bit-array filter: insert, query, union, intersection estimate
//! - [`CountingBloomFilter`] - 4-bit counters instead of bits, adds `remove`
//!
//! # Choosing a Filter
//!
//! | Filter | Use Case | Memory | Operations |
//! |--------|----------|--------|------------|
//! | [`BloomFilter`] | Known size, no deletion | m bits | Insert, Query, Union |
//! | [`CountingBloomFilter`] | Need deletion | 4 × m bits | Insert, Remove, Query, Union |
//!
//! Both share the same sizing, hashing and binary format; only the payload
//! word width differs.
//!
//! # Examples
//!
//! ```
//! use bloomgate::filters::{BloomFilter, CountingBloomFilter};
//!
//! let filter = BloomFilter::new(10_000, 0.01).unwrap();
//! filter.insert("hello");
//! assert!(filter.contains("hello"));
//!
//! let counting = CountingBloomFilter::new(10_000, 0.01).unwrap();
//! counting.insert("temporary");
//! assert!(counting.remove("temporary").unwrap());
//! assert!(!counting.contains("temporary"));
//! ```

pub mod counting;
pub mod standard;

pub use counting::CountingBloomFilter;
pub use standard::BloomFilter;

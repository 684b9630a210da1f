//! Hashing for Bloom filters: seeded base hashes and double-hash index derivation.
//!
//! # Module Structure
//!
//! ```text
//! hash/
//! ├── hasher.rs   - BloomHasher trait and FnvHasher
//! ├── xxhash.rs   - XxHasher (XXH3-64), the default
//! ├── deriver.rs  - double hashing, (h1 + i·h2) mod m
//! └── mod.rs      - this file
//! ```
//!
//! # Choosing a Hash Function
//!
//! | Hash Function  | Speed     | Quality   | Use Case                          |
//! |----------------|-----------|-----------|-----------------------------------|
//! | [`XxHasher`]   | Very fast | Excellent | Default for every filter          |
//! | [`FnvHasher`]  | Fast      | Fair      | No third-party code in the path   |
//!
//! The binary format stores the seed but not the hasher type. Restore a
//! filter with the same hasher type it was written with.
//!
//! # Examples
//!
//! ```
//! use bloomgate::hash::{BloomHasher, IndexDeriver, XxHasher};
//!
//! let deriver = IndexDeriver::new(XxHasher::with_seed(1), 1024, 7);
//! let indices: Vec<usize> = deriver.indices(b"hello").collect();
//! assert_eq!(indices.len(), 7);
//! assert!(indices.iter().all(|&i| i < 1024));
//! ```

pub mod deriver;
pub mod hasher;
pub mod xxhash;

pub use deriver::{double_hash_indices, IndexDeriver, Indices};
pub use hasher::{BloomHasher, FnvHasher, DEFAULT_SEED};
pub use xxhash::XxHasher;

/// Hasher used when a filter's hasher type is not named.
pub type DefaultHasher = XxHasher;

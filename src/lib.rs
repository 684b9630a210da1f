//! bloomgate: concurrent Bloom filters with a stable binary format.
//!
//! A Bloom filter is a space-efficient probabilistic data structure that tests whether
//! an element is a member of a set. It can produce:
//! - **False positives**: may report an element that was never inserted
//! - **Zero false negatives**: every inserted element is always reported present
//!
//! # Quick Start
//!
//! ```
//! use bloomgate::BloomFilter;
//!
//! // 50 items at 1% false positives
//! let filter = BloomFilter::new(50, 0.01).unwrap();
//!
//! filter.insert("google");
//! filter.insert("openai");
//!
//! assert!(filter.contains("google"));
//! assert!(filter.contains("openai"));
//! // Almost always false; a true here would be a false positive.
//! let _maybe = filter.contains("microsoft");
//! ```
//!
//! # Concurrency
//!
//! Filters are `Send + Sync` and take `&self` for `insert`, `contains`,
//! `serialize`, and counting `remove`. Share them with `Arc`, no `Mutex`:
//!
//! ```
//! use bloomgate::BloomFilter;
//! use std::sync::Arc;
//!
//! let filter = Arc::new(BloomFilter::new(10_000, 0.01).unwrap());
//!
//! let handle = {
//!     let filter = Arc::clone(&filter);
//!     std::thread::spawn(move || filter.insert("from-thread"))
//! };
//! handle.join().unwrap();
//! assert!(filter.contains("from-thread"));
//! ```
//!
//! Inserts set bits with atomic `fetch_or` under a shared gate; `serialize`
//! takes the gate exclusively, so a snapshot never contains half an insert.
//!
//! # Using Builders
//!
//! ```
//! use bloomgate::builder::BloomFilterBuilder;
//!
//! let filter = BloomFilterBuilder::new()
//!     .expected_items(10_000)
//!     .false_positive_rate(0.001)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//! assert_eq!(filter.hash_count(), 10);
//! ```
//!
//! # Persistence
//!
//! ```
//! use bloomgate::BloomFilter;
//!
//! let filter = BloomFilter::new(1000, 0.01).unwrap();
//! filter.insert("persisted");
//!
//! let bytes = filter.serialize();
//! let restored: BloomFilter = BloomFilter::deserialize(&bytes).unwrap();
//! assert!(restored.contains("persisted"));
//! ```
//!
//! The layout is documented in [`format`].
//!
//! # Features
//!
//! - `serde` (default) - `Serialize`/`Deserialize`, typed items via bincode, [`builder::FilterConfig`]
//! - `trace` (default) - `tracing` events for construction, merging, and persistence

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(html_root_url = "https://docs.rs/bloomgate/0.1.0")]

/// Storage, sizing math, and the shared filter trait
pub mod core;

/// Error types and result aliases
pub mod error;

/// Filter implementations
pub mod filters;

/// Binary encoding shared by both filter kinds
pub mod format;

/// Hash functions and index derivation
pub mod hash;

/// Type-safe builders and configuration
pub mod builder;

/// Serialization support (requires `serde` feature)
#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub mod serde_support;

#[cfg(all(test, feature = "trace"))]
mod trace_capture;

pub use error::{FilterError, Result};

pub use crate::core::filter::MembershipFilter;
pub use crate::core::params::FilterParameters;

pub use filters::{BloomFilter, CountingBloomFilter};

pub use builder::{BloomFilterBuilder, CountingBloomFilterBuilder};

#[cfg(feature = "serde")]
pub use builder::FilterConfig;

pub use hash::{BloomHasher, DefaultHasher, FnvHasher, XxHasher, DEFAULT_SEED};

/// Prelude module for convenient imports.
///
/// # Examples
///
/// ```
/// use bloomgate::prelude::*;
///
/// let filter = BloomFilter::new(1000, 0.01).unwrap();
/// filter.insert("hello");
/// assert!(filter.contains("hello"));
/// ```
pub mod prelude {
    pub use crate::builder::{BloomFilterBuilder, CountingBloomFilterBuilder};
    pub use crate::core::filter::MembershipFilter;
    pub use crate::core::params::FilterParameters;
    pub use crate::error::{FilterError, Result};
    pub use crate::filters::{BloomFilter, CountingBloomFilter};
    pub use crate::hash::{BloomHasher, FnvHasher, XxHasher};

    #[cfg(feature = "serde")]
    pub use crate::builder::FilterConfig;
}

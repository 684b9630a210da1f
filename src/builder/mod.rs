//! Builder pattern for Bloom filter construction.
//!
//! This module provides fluent, type-safe builders for both filter kinds
//! with compile-time guarantees that sizing is provided.
//!
//! # Type-State Pattern
//!
//! Builders progress through states and only offer `build` once sizing is
//! complete, either from capacity and error rate or from explicit `(m, k)`:
//!
//! ```text
//! Initial ─.expected_items()─▶ WithItems ─.false_positive_rate()─▶ Complete ─.build()─▶ filter
//!    └──────────────────────.explicit(m, k)──────────────────────────▶ Complete
//! ```
//!
//! ## Error Handling
//!
//! - **Compile-time errors**: missing sizing parameters
//! - **Runtime errors**: invalid values, reported as
//!   [`FilterError::InvalidParameter`](crate::FilterError::InvalidParameter)
//!
//! # Examples
//!
//! ```
//! use bloomgate::builder::{BloomFilterBuilder, CountingBloomFilterBuilder};
//!
//! let filter = BloomFilterBuilder::new()
//!     .expected_items(10_000)
//!     .false_positive_rate(0.01)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//! assert_eq!(filter.seed(), 42);
//!
//! let counting = CountingBloomFilterBuilder::new()
//!     .explicit(4096, 5)
//!     .build()
//!     .unwrap();
//! assert_eq!(counting.bit_count(), 4096);
//! ```
//!
//! # Builder Comparison
//!
//! | Builder | Required Parameters | Optional Parameters |
//! |---------|---------------------|---------------------|
//! | [`BloomFilterBuilder`] | items + fp_rate, or explicit (m, k) | seed, hasher |
//! | [`CountingBloomFilterBuilder`] | items + fp_rate, or explicit (m, k) | seed, hasher |

#![allow(clippy::module_name_repetitions)]

#[cfg(feature = "serde")]
pub mod config;
pub mod counting;
pub mod standard;

#[cfg(feature = "serde")]
pub use config::FilterConfig;
pub use counting::CountingBloomFilterBuilder;
pub use standard::BloomFilterBuilder;

use crate::core::params::FilterParameters;
use crate::error::{FilterError, Result};

/// Type-state marker: no sizing set.
#[derive(Debug)]
pub struct Initial;

/// Type-state marker: expected item count set.
#[derive(Debug)]
pub struct WithItems;

/// Type-state marker: sizing complete, ready to build.
#[derive(Debug)]
pub struct Complete;

/// Sizing collected so far by a builder.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Sizing {
    Pending,
    Items(u64),
    Capacity(u64, f64),
    Explicit(u64, u32),
}

impl Sizing {
    /// Run the sizing calculator for the collected values.
    pub(crate) fn resolve(self) -> Result<FilterParameters> {
        match self {
            Sizing::Capacity(items, fp_rate) => FilterParameters::from_capacity(items, fp_rate),
            Sizing::Explicit(m, k) => FilterParameters::explicit(m, k),
            Sizing::Pending | Sizing::Items(_) => Err(FilterError::invalid_parameter(
                "builder sizing is incomplete",
            )),
        }
    }

    pub(crate) fn with_fp_rate(self, fp_rate: f64) -> Self {
        match self {
            Sizing::Items(items) => Sizing::Capacity(items, fp_rate),
            other => other,
        }
    }
}

/// Prelude for convenient builder imports.
pub mod prelude {
    #[cfg(feature = "serde")]
    pub use super::FilterConfig;
    pub use super::{BloomFilterBuilder, CountingBloomFilterBuilder};
}

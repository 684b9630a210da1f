//! Filter settings loadable from configuration files.
//!
//! ```
//! use bloomgate::builder::FilterConfig;
//!
//! let config: FilterConfig = serde_json::from_str(
//!     r#"{ "expected_items": 5000, "false_positive_rate": 0.001 }"#,
//! ).unwrap();
//!
//! let filter = config.build_standard().unwrap();
//! assert_eq!(filter.hash_count(), 10);
//! ```

use crate::error::Result;
use crate::filters::{BloomFilter, CountingBloomFilter};
use crate::hash::DEFAULT_SEED;
use serde::{Deserialize, Serialize};

fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// Sizing and seed for one filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Expected number of distinct items, `n`.
    pub expected_items: u64,
    /// Target false positive probability, `p`.
    pub false_positive_rate: f64,
    /// Hash seed; omitted means the crate default.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl FilterConfig {
    /// Settings for `expected_items` at `false_positive_rate` with the default seed.
    #[must_use]
    pub fn new(expected_items: u64, false_positive_rate: f64) -> Self {
        Self {
            expected_items,
            false_positive_rate,
            seed: DEFAULT_SEED,
        }
    }

    /// Build a [`BloomFilter`] from these settings.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`](crate::FilterError::InvalidParameter)
    /// if the settings are out of range.
    pub fn build_standard(&self) -> Result<BloomFilter> {
        BloomFilter::with_seed(self.expected_items, self.false_positive_rate, self.seed)
    }

    /// Build a [`CountingBloomFilter`] from these settings.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`](crate::FilterError::InvalidParameter)
    /// if the settings are out of range.
    pub fn build_counting(&self) -> Result<CountingBloomFilter> {
        CountingBloomFilter::with_seed(self.expected_items, self.false_positive_rate, self.seed)
    }
}

impl Default for FilterConfig {
    /// 100 items at 1% false positives.
    fn default() -> Self {
        Self::new(100, 0.01)
    }
}

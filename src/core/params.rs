//! Sizing math and the immutable filter parameter record.
//!
//! # Mathematical Background
//!
//! Given:
//! - `n`: expected number of distinct items
//! - `p`: target false positive probability, strictly inside `(0, 1)`
//!
//! Sizing:
//! - `m = ceil(-n × ln(p) / (ln 2)²)` (bits in filter)
//! - `k = max(1, round((m/n) × ln 2))` (hash functions)
//!
//! Expected false positive rate after `n` insertions:
//! - `(1 - e^(-kn/m))^k`
//!
//! The bound assumes independent hash functions. Double hashing approximates
//! that well in practice but not exactly.
//!
//! # Examples
//!
//! ```
//! use bloomgate::core::params::FilterParameters;
//!
//! let params = FilterParameters::from_capacity(1000, 0.01).unwrap();
//! assert_eq!(params.bit_count(), 9586);
//! assert_eq!(params.hash_count(), 7);
//! ```
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/Time Trade-offs in Hash Coding with Allowable Errors"
//! - Kirsch & Mitzenmacher (2006). "Less Hashing, Same Performance: Building a Better Bloom Filter"

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

use crate::error::{FilterError, Result};
use std::f64::consts::LN_2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// (ln 2)² ≈ 0.4804530139182014
const LN2_SQUARED: f64 = LN_2 * LN_2;

/// Minimum number of hash functions.
pub const MIN_HASH_COUNT: u32 = 1;

/// Maximum number of hash functions accepted anywhere in the crate.
///
/// The sizing formula only exceeds this for targets below roughly `1e-19`.
pub const MAX_HASH_COUNT: u32 = 64;

/// Largest bit (or counter) count a filter may be sized to: 2^40.
pub const MAX_BIT_COUNT: u64 = 1 << 40;

/// Expected item count used by `Default` constructors.
pub const DEFAULT_EXPECTED_ITEMS: u64 = 100;

/// False positive rate used by `Default` constructors.
pub const DEFAULT_FALSE_POSITIVE_RATE: f64 = 0.01;

fn validate_fp_rate(fp_rate: f64) -> Result<()> {
    // NaN fails both comparisons, so it lands in the error branch too.
    if !(fp_rate > 0.0 && fp_rate < 1.0) {
        return Err(FilterError::invalid_parameter(format!(
            "false positive rate must be in (0, 1), got {}",
            fp_rate
        )));
    }
    Ok(())
}

fn validate_bit_count(m: u64) -> Result<()> {
    if m == 0 {
        return Err(FilterError::invalid_parameter("bit count must be > 0"));
    }
    if m > MAX_BIT_COUNT {
        return Err(FilterError::invalid_parameter(format!(
            "bit count {} exceeds maximum {}",
            m, MAX_BIT_COUNT
        )));
    }
    if usize::try_from(m).is_err() {
        return Err(FilterError::invalid_parameter(format!(
            "bit count {} is not addressable on this platform",
            m
        )));
    }
    Ok(())
}

fn validate_hash_count(k: u32) -> Result<()> {
    if !(MIN_HASH_COUNT..=MAX_HASH_COUNT).contains(&k) {
        return Err(FilterError::invalid_parameter(format!(
            "hash count must be in [{}, {}], got {}",
            MIN_HASH_COUNT, MAX_HASH_COUNT, k
        )));
    }
    Ok(())
}

/// Calculate the number of bits for `n` items at false positive rate `fp_rate`.
///
/// Implements `m = ceil(-n × ln(p) / (ln 2)²)`.
///
/// # Errors
///
/// [`FilterError::InvalidParameter`] if `n == 0`, if `fp_rate` is outside
/// `(0, 1)`, or if the result exceeds [`MAX_BIT_COUNT`].
///
/// # Examples
///
/// ```
/// use bloomgate::core::params::optimal_bit_count;
///
/// assert_eq!(optimal_bit_count(1000, 0.01).unwrap(), 9586);
/// assert!(optimal_bit_count(1000, 1.0).is_err());
/// ```
pub fn optimal_bit_count(n: u64, fp_rate: f64) -> Result<u64> {
    if n == 0 {
        return Err(FilterError::invalid_parameter("expected item count must be > 0"));
    }
    validate_fp_rate(fp_rate)?;

    let m = (-(n as f64) * fp_rate.ln() / LN2_SQUARED).ceil();
    if !m.is_finite() || m > MAX_BIT_COUNT as f64 {
        return Err(FilterError::invalid_parameter(format!(
            "computed bit count {:.0} exceeds maximum {}; raise the false positive rate or lower the item count",
            m, MAX_BIT_COUNT
        )));
    }

    // fp_rate < 1 and n >= 1 keep m strictly positive
    let m = (m as u64).max(1);
    Ok(m)
}

/// Calculate the number of hash functions for `m` bits holding `n` items.
///
/// Implements `k = max(1, round((m/n) × ln 2))`.
///
/// # Errors
///
/// [`FilterError::InvalidParameter`] if `m == 0`, `n == 0`, or the result
/// exceeds [`MAX_HASH_COUNT`].
pub fn optimal_hash_count(m: u64, n: u64) -> Result<u32> {
    if m == 0 {
        return Err(FilterError::invalid_parameter("bit count must be > 0"));
    }
    if n == 0 {
        return Err(FilterError::invalid_parameter("expected item count must be > 0"));
    }

    let k = ((m as f64 / n as f64) * LN_2).round();
    if k > f64::from(MAX_HASH_COUNT) {
        return Err(FilterError::invalid_parameter(format!(
            "computed hash count {:.0} exceeds maximum {}",
            k, MAX_HASH_COUNT
        )));
    }

    Ok((k as u32).max(MIN_HASH_COUNT))
}

/// Theoretical false positive rate of an `(m, k)` filter after `n` insertions.
///
/// Implements `(1 - e^(-kn/m))^k`, clamped to `[0, 1]`.
///
/// # Errors
///
/// [`FilterError::InvalidParameter`] if `m == 0` or `k` is out of range.
pub fn expected_fp_rate(m: u64, n: u64, k: u32) -> Result<f64> {
    if m == 0 {
        return Err(FilterError::invalid_parameter("bit count must be > 0"));
    }
    validate_hash_count(k)?;

    if n == 0 {
        return Ok(0.0);
    }

    let k_f64 = f64::from(k);
    let prob_bit_one = 1.0 - (-(k_f64 * n as f64) / m as f64).exp();
    Ok(prob_bit_one.powf(k_f64).clamp(0.0, 1.0))
}

/// Bits needed per stored item to reach `fp_rate`: `-ln(p) / (ln 2)²`.
///
/// # Errors
///
/// [`FilterError::InvalidParameter`] if `fp_rate` is outside `(0, 1)`.
pub fn bits_per_element(fp_rate: f64) -> Result<f64> {
    validate_fp_rate(fp_rate)?;
    Ok(-fp_rate.ln() / LN2_SQUARED)
}

/// Immutable sizing record of a filter.
///
/// Computed once at construction and never mutated. `m > 0` and
/// `1 <= k <= MAX_HASH_COUNT` always hold.
///
/// For filters built from explicit `(m, k)` or restored from bytes, the
/// design-time inputs are unknown and read back as `0` and `0.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawParameters"))]
pub struct FilterParameters {
    m: u64,
    k: u32,
    n_expected: u64,
    p_target: f64,
}

impl FilterParameters {
    /// Size a filter for `n_expected` items at false positive rate `p_target`.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`] if `n_expected == 0`, if `p_target`
    /// is outside `(0, 1)`, or if the computed size is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomgate::core::params::FilterParameters;
    ///
    /// let params = FilterParameters::from_capacity(10_000, 0.01).unwrap();
    /// assert_eq!(params.hash_count(), 7);
    /// assert_eq!(params.expected_items(), 10_000);
    /// assert!(FilterParameters::from_capacity(0, 0.01).is_err());
    /// ```
    pub fn from_capacity(n_expected: u64, p_target: f64) -> Result<Self> {
        let m = optimal_bit_count(n_expected, p_target)?;
        let k = optimal_hash_count(m, n_expected)?;
        validate_bit_count(m)?;
        Ok(Self {
            m,
            k,
            n_expected,
            p_target,
        })
    }

    /// Use an explicit bit count and hash count.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`] if `m == 0`, `m` exceeds
    /// [`MAX_BIT_COUNT`], or `k` is outside `[1, MAX_HASH_COUNT]`.
    pub fn explicit(m: u64, k: u32) -> Result<Self> {
        validate_bit_count(m)?;
        validate_hash_count(k)?;
        Ok(Self {
            m,
            k,
            n_expected: 0,
            p_target: 0.0,
        })
    }

    /// Number of bits (or counters), `m`.
    #[must_use]
    #[inline]
    pub const fn bit_count(&self) -> u64 {
        self.m
    }

    /// Number of hash functions, `k`.
    #[must_use]
    #[inline]
    pub const fn hash_count(&self) -> u32 {
        self.k
    }

    /// Design-time expected item count, `0` when unknown.
    #[must_use]
    pub const fn expected_items(&self) -> u64 {
        self.n_expected
    }

    /// Design-time false positive target, `0.0` when unknown.
    #[must_use]
    pub const fn target_fp_rate(&self) -> f64 {
        self.p_target
    }

    /// Theoretical false positive rate at the design load.
    ///
    /// Returns `None` when the expected item count is unknown.
    #[must_use]
    pub fn design_fp_rate(&self) -> Option<f64> {
        if self.n_expected == 0 {
            return None;
        }
        expected_fp_rate(self.m, self.n_expected, self.k).ok()
    }

    /// Recheck the record invariant.
    ///
    /// Records built by [`from_capacity`](Self::from_capacity) or
    /// [`explicit`](Self::explicit) always pass. Deserialized records are
    /// routed through here as well.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`] if `m` or `k` is out of range, or if
    /// a known expected item count carries a target outside `(0, 1)`.
    pub fn validate(&self) -> Result<()> {
        validate_bit_count(self.m)?;
        validate_hash_count(self.k)?;
        if self.n_expected > 0 {
            validate_fp_rate(self.p_target)
        } else if self.p_target != 0.0 {
            Err(FilterError::invalid_parameter(format!(
                "false positive target {} given without an expected item count",
                self.p_target
            )))
        } else {
            Ok(())
        }
    }

    /// `m` as a `usize` index bound. Validated at construction.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.m as usize
    }
}

/// Unchecked wire shape of [`FilterParameters`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawParameters {
    m: u64,
    k: u32,
    n_expected: u64,
    p_target: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawParameters> for FilterParameters {
    type Error = FilterError;

    fn try_from(raw: RawParameters) -> Result<Self> {
        let params = Self {
            m: raw.m,
            k: raw.k,
            n_expected: raw.n_expected,
            p_target: raw.p_target,
        };
        params.validate()?;
        Ok(params)
    }
}

impl Default for FilterParameters {
    fn default() -> Self {
        // n = 100, p = 0.01 -> m = 959, k = 7
        Self {
            m: 959,
            k: 7,
            n_expected: DEFAULT_EXPECTED_ITEMS,
            p_target: DEFAULT_FALSE_POSITIVE_RATE,
        }
    }
}

//! Packed 4-bit saturating counters for the counting filter.
//!
//! Sixteen counters share each `AtomicU64` word; counter `i` lives in word
//! `i / 16` at nibble `i % 16`. Increments and decrements are compare-and-swap
//! loops on the owning word, so concurrent updates of neighboring counters
//! never lose each other's writes.
//!
//! A counter that reaches [`COUNTER_MAX`] is saturated: further increments
//! are dropped and decrements leave it alone, because its true count is no
//! longer known. Counters never wrap and never go below zero.
//!
//! ```
//! use bloomgate::core::counters::{CounterStore, COUNTER_MAX};
//!
//! let counters = CounterStore::new(32).unwrap();
//! assert!(counters.increment(5));
//! assert_eq!(counters.get(5), 1);
//! for _ in 0..20 {
//!     counters.increment(5);
//! }
//! assert_eq!(counters.get(5), COUNTER_MAX);
//! ```

use crate::error::{FilterError, Result};
use std::sync::atomic::{AtomicU64, Ordering};

/// Width of one counter in bits.
pub const COUNTER_BITS: usize = 4;

/// Counters per 64-bit word.
pub const COUNTERS_PER_WORD: usize = 64 / COUNTER_BITS;

/// Saturation value of a counter.
pub const COUNTER_MAX: u8 = (1 << COUNTER_BITS) - 1;

const NIBBLE_MASK: u64 = COUNTER_MAX as u64;

/// Number of words needed for `counters` counters.
#[inline]
#[must_use]
pub const fn words_for(counters: usize) -> usize {
    (counters + COUNTERS_PER_WORD - 1) / COUNTERS_PER_WORD
}

#[inline]
fn locate(index: usize) -> (usize, u32) {
    (
        index / COUNTERS_PER_WORD,
        ((index % COUNTERS_PER_WORD) * COUNTER_BITS) as u32,
    )
}

#[inline]
fn nibble(word: u64, shift: u32) -> u8 {
    ((word >> shift) & NIBBLE_MASK) as u8
}

/// Fixed-size array of `m` four-bit saturating counters.
#[derive(Debug)]
pub struct CounterStore {
    words: Box<[AtomicU64]>,
    len: usize,
}

impl CounterStore {
    /// Create `num_counters` zeroed counters.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`] if `num_counters` is 0.
    pub fn new(num_counters: usize) -> Result<Self> {
        if num_counters == 0 {
            return Err(FilterError::invalid_parameter(
                "CounterStore size must be greater than 0",
            ));
        }

        Ok(Self::zeroed(num_counters))
    }

    pub(crate) fn zeroed(num_counters: usize) -> Self {
        let words = (0..words_for(num_counters))
            .map(|_| AtomicU64::new(0))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            words,
            len: num_counters,
        }
    }

    /// Rebuild a store from raw words.
    ///
    /// # Errors
    ///
    /// [`FilterError::CorruptData`] if the word count is not exactly
    /// `ceil(len / 16)` or a counter past `len` is non-zero.
    pub fn from_words(raw: Vec<u64>, len: usize) -> Result<Self> {
        if len == 0 {
            return Err(FilterError::corrupt_data("counter count must be greater than 0"));
        }

        let expected = words_for(len);
        if raw.len() != expected {
            return Err(FilterError::corrupt_data(format!(
                "expected {} words for {} counters, got {}",
                expected,
                len,
                raw.len()
            )));
        }

        let tail = len % COUNTERS_PER_WORD;
        if tail != 0 {
            let tail_mask = !0u64 << (tail * COUNTER_BITS);
            if raw[expected - 1] & tail_mask != 0 {
                return Err(FilterError::corrupt_data(
                    "non-zero counters beyond the declared counter count",
                ));
            }
        }

        let words = raw
            .into_iter()
            .map(AtomicU64::new)
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Ok(Self { words, len })
    }

    /// Number of counters, `m`.
    #[must_use]
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always `false` for a constructed store.
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current value of counter `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[must_use]
    #[inline]
    pub fn get(&self, index: usize) -> u8 {
        self.check_index(index);
        let (word, shift) = locate(index);
        nibble(self.words[word].load(Ordering::Acquire), shift)
    }

    /// Increment counter `index`, saturating at [`COUNTER_MAX`].
    ///
    /// Returns `false` if the counter was already saturated.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn increment(&self, index: usize) -> bool {
        self.check_index(index);
        let (word, shift) = locate(index);
        let cell = &self.words[word];
        let mut current = cell.load(Ordering::Acquire);

        loop {
            if nibble(current, shift) == COUNTER_MAX {
                return false;
            }

            match cell.compare_exchange_weak(
                current,
                current + (1u64 << shift),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Decrement counter `index`.
    ///
    /// Returns `false`, leaving the counter untouched, if it is already zero.
    /// A saturated counter is left at [`COUNTER_MAX`] and reported as `true`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn decrement(&self, index: usize) -> bool {
        self.check_index(index);
        let (word, shift) = locate(index);
        let cell = &self.words[word];
        let mut current = cell.load(Ordering::Acquire);

        loop {
            match nibble(current, shift) {
                0 => return false,
                COUNTER_MAX => return true,
                _ => {}
            }

            match cell.compare_exchange_weak(
                current,
                current - (1u64 << shift),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Reset every counter to 0.
    pub fn clear(&mut self) {
        for word in self.words.iter_mut() {
            *word.get_mut() = 0;
        }
    }

    /// Number of counters that are non-zero.
    #[must_use]
    pub fn nonzero_count(&self) -> usize {
        self.count_matching(|c| c != 0)
    }

    /// Number of counters stuck at [`COUNTER_MAX`].
    #[must_use]
    pub fn saturated_count(&self) -> usize {
        self.count_matching(|c| c == COUNTER_MAX)
    }

    /// New store whose counters are the saturating sum of both inputs.
    ///
    /// # Errors
    ///
    /// [`FilterError::IncompatibleFilter`] if the lengths differ.
    pub fn union(&self, other: &Self) -> Result<Self> {
        if self.len != other.len {
            return Err(FilterError::incompatible_filter(format!(
                "counter count mismatch: {} vs {}",
                self.len, other.len
            )));
        }

        let words = self
            .words
            .iter()
            .zip(other.words.iter())
            .map(|(a, b)| {
                let (a, b) = (a.load(Ordering::Acquire), b.load(Ordering::Acquire));
                let mut sum = 0u64;
                for slot in 0..COUNTERS_PER_WORD {
                    let shift = (slot * COUNTER_BITS) as u32;
                    let total = (nibble(a, shift) + nibble(b, shift)).min(COUNTER_MAX);
                    sum |= u64::from(total) << shift;
                }
                AtomicU64::new(sum)
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Ok(Self {
            words,
            len: self.len,
        })
    }

    /// Snapshot of the backing words.
    #[must_use]
    pub fn to_words(&self) -> Vec<u64> {
        self.words
            .iter()
            .map(|word| word.load(Ordering::Acquire))
            .collect()
    }

    /// Heap plus inline size in bytes.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.words.len() * std::mem::size_of::<AtomicU64>() + std::mem::size_of::<Self>()
    }

    fn count_matching(&self, pred: impl Fn(u8) -> bool) -> usize {
        (0..self.len).filter(|&i| pred(self.get(i))).count()
    }

    #[inline]
    fn check_index(&self, index: usize) {
        assert!(
            index < self.len,
            "CounterStore index out of bounds: index={} len={}",
            index,
            self.len
        );
    }
}

impl Clone for CounterStore {
    fn clone(&self) -> Self {
        let words = self
            .words
            .iter()
            .map(|word| AtomicU64::new(word.load(Ordering::Acquire)))
            .collect();

        Self {
            words,
            len: self.len,
        }
    }
}

impl PartialEq for CounterStore {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.to_words() == other.to_words()
    }
}

impl Eq for CounterStore {}

//! Core building blocks shared by every filter.
//!
//! # Module Organization
//!
//! ```text
//! core/
//! ├── bitstore.rs  - lock-free bit array (BitStore)
//! ├── counters.rs  - packed 4-bit saturating counters (CounterStore)
//! ├── filter.rs    - MembershipFilter trait
//! ├── params.rs    - sizing math and FilterParameters
//! └── mod.rs       - this file
//! ```
//!
//! Storage types hand out `&self` mutation through atomics and panic on
//! out-of-range indices; sizing functions validate their inputs and return
//! [`Result`](crate::Result).

pub mod bitstore;
pub mod counters;
pub mod filter;
pub mod params;

pub use bitstore::BitStore;
pub use counters::{CounterStore, COUNTER_MAX};
pub use filter::MembershipFilter;
pub use params::{
    bits_per_element, expected_fp_rate, optimal_bit_count, optimal_hash_count, FilterParameters,
    MAX_BIT_COUNT, MAX_HASH_COUNT, MIN_HASH_COUNT,
};

//! Serialization support for Bloom filters.
//!
//! Both filter kinds implement `Serialize`/`Deserialize` by writing their
//! binary encoding ([`crate::format`]) as a single serde byte string. Every
//! serde format therefore goes through the same validated codec, and a
//! payload produced by `filter.serialize()` is exactly what bincode stores
//! after its length prefix.
//!
//! # Feature Flag
//!
//! This module is only available when the `serde` feature is enabled
//! (it is on by default):
//!
//! ```toml
//! [dependencies]
//! bloomgate = { version = "0.1", features = ["serde"] }
//! ```
//!
//! # Examples
//!
//! ## Binary (bincode)
//!
//! ```
//! use bloomgate::filters::BloomFilter;
//!
//! let filter = BloomFilter::new(1000, 0.01).unwrap();
//! filter.insert("hello");
//!
//! let bytes = bincode::serialize(&filter).unwrap();
//! let restored: BloomFilter = bincode::deserialize(&bytes).unwrap();
//! assert!(restored.contains("hello"));
//! ```
//!
//! ## JSON
//!
//! ```
//! use bloomgate::filters::CountingBloomFilter;
//!
//! let filter = CountingBloomFilter::new(100, 0.01).unwrap();
//! filter.insert("hello");
//!
//! let json = serde_json::to_string(&filter).unwrap();
//! let restored: CountingBloomFilter = serde_json::from_str(&json).unwrap();
//! assert!(restored.contains("hello"));
//! ```
//!
//! # Hasher Compatibility
//!
//! The encoding records the seed but not the hasher type. Decoding into a
//! filter with a different `H` succeeds and yields meaningless answers; use
//! the same hasher on both sides.

pub mod counting;
pub mod standard;

use serde::de::{self, SeqAccess, Visitor};
use std::fmt;

/// Accepts a serde byte string, or a sequence of `u8` for formats such as
/// JSON that write bytes as an array.
pub(crate) struct PayloadVisitor;

impl<'de> Visitor<'de> for PayloadVisitor {
    type Value = Vec<u8>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an encoded bloom filter byte string")
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
        Ok(v.to_vec())
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
        Ok(v)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(byte) = seq.next_element::<u8>()? {
            bytes.push(byte);
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use crate::filters::{BloomFilter, CountingBloomFilter};

    #[test]
    fn test_bincode_payload_is_binary_encoding() {
        let filter = BloomFilter::new(100, 0.01).unwrap();
        filter.insert("x");

        let raw = filter.serialize();
        let wrapped = bincode::serialize(&filter).unwrap();
        // bincode prefixes byte strings with a u64 length
        assert_eq!(&wrapped[..8], &(raw.len() as u64).to_le_bytes());
        assert_eq!(&wrapped[8..], &raw[..]);
    }

    #[test]
    fn test_rejects_corrupt_payload() {
        let filter = CountingBloomFilter::new(100, 0.01).unwrap();
        let mut raw = filter.serialize();
        raw[0] = 9;
        let wrapped = bincode::serialize(&raw).unwrap();

        let result: Result<CountingBloomFilter, _> = bincode::deserialize(&wrapped);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("version 9"), "unexpected error: {}", err);
    }

    #[test]
    fn test_json_rejects_wrong_shape() {
        assert!(serde_json::from_str::<BloomFilter>("\"not bytes\"").is_err());
        assert!(serde_json::from_str::<BloomFilter>("[1, 2, 3]").is_err());
    }
}

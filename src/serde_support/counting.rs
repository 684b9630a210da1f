//! Serde support for [`CountingBloomFilter`].

use super::PayloadVisitor;
use crate::filters::counting::CountingBloomFilter;
use crate::hash::BloomHasher;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

impl<H: BloomHasher> Serialize for CountingBloomFilter<H> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&CountingBloomFilter::serialize(self))
    }
}

impl<'de, H: BloomHasher> Deserialize<'de> for CountingBloomFilter<H> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = deserializer.deserialize_byte_buf(PayloadVisitor)?;
        CountingBloomFilter::deserialize(&bytes).map_err(de::Error::custom)
    }
}

//! Serde support for [`BloomFilter`].

use super::PayloadVisitor;
use crate::filters::standard::BloomFilter;
use crate::hash::BloomHasher;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

impl<H: BloomHasher> Serialize for BloomFilter<H> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&BloomFilter::serialize(self))
    }
}

impl<'de, H: BloomHasher> Deserialize<'de> for BloomFilter<H> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = deserializer.deserialize_byte_buf(PayloadVisitor)?;
        BloomFilter::deserialize(&bytes).map_err(de::Error::custom)
    }
}

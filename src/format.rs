//! Versioned binary layout shared by both filter kinds.
//!
//! # Format
//!
//! ```text
//! [Header: 29 bytes]
//!   Version:        1 byte   (currently 1)
//!   m:              8 bytes  (u64 LE, bits or counters)
//!   k:              4 bytes  (u32 LE, hash count)
//!   Seed:           8 bytes  (u64 LE)
//!   Inserted count: 8 bytes  (u64 LE, diagnostic only)
//!
//! [Data: ceil(m / slots_per_word) × 8 bytes]
//!   Storage words, u64 LE each
//! ```
//!
//! A standard filter packs 64 bits per word and a counting filter packs 16
//! four-bit counters per word. The header does not record which kind wrote
//! the payload; each filter type decodes with its own word width, and the
//! exact-length check rejects most mix-ups.
//!
//! Every field is written and read explicitly with `to_le_bytes` /
//! `from_le_bytes`, so the layout is independent of host endianness and
//! alignment, and decoding never reads past the buffer.
//!
//! ```
//! use bloomgate::filters::BloomFilter;
//! use bloomgate::format::{read_header, FORMAT_VERSION, HEADER_LEN};
//!
//! let filter = BloomFilter::new(1000, 0.01).unwrap();
//! filter.insert("hello");
//! let bytes = filter.serialize();
//!
//! let header = read_header(&bytes).unwrap();
//! assert_eq!(header.version, FORMAT_VERSION);
//! assert_eq!(header.bit_count, 9586);
//! assert_eq!(header.inserted_count, 1);
//! assert_eq!(bytes.len(), HEADER_LEN + 150 * 8);
//! ```

use crate::core::params::{MAX_BIT_COUNT, MAX_HASH_COUNT, MIN_HASH_COUNT};
use crate::error::{FilterError, Result};

/// Current format version.
pub const FORMAT_VERSION: u8 = 1;

/// Header size in bytes.
pub const HEADER_LEN: usize = 29;

const WORD_BYTES: usize = 8;

/// Decoded header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatHeader {
    /// Format version byte.
    pub version: u8,
    /// Number of bits or counters, `m`.
    pub bit_count: u64,
    /// Number of hash functions, `k`.
    pub hash_count: u32,
    /// Hash seed.
    pub seed: u64,
    /// Insert counter at the time of writing.
    pub inserted_count: u64,
}

/// Low-level decoding failures, surfaced to callers as
/// [`FilterError::CorruptData`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// Input shorter than the fixed header.
    #[error("buffer too small: expected at least {expected} bytes, got {actual}")]
    Truncated {
        /// Required length.
        expected: usize,
        /// Length provided.
        actual: usize,
    },

    /// Version byte is not one this build understands.
    #[error("unsupported format version {0} (expected {})", FORMAT_VERSION)]
    UnsupportedVersion(u8),

    /// `m` is zero or above the supported maximum.
    #[error("invalid bit count: {0}")]
    InvalidBitCount(u64),

    /// `k` is outside the supported range.
    #[error("invalid hash count: {0}")]
    InvalidHashCount(u32),

    /// Payload length does not match `m`.
    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        /// Length implied by the header.
        expected: usize,
        /// Length provided.
        actual: usize,
    },
}

impl From<FormatError> for FilterError {
    fn from(err: FormatError) -> Self {
        FilterError::corrupt_data(err.to_string())
    }
}

#[inline]
fn read_u64(bytes: &[u8], at: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[at..at + 8]);
    u64::from_le_bytes(buf)
}

#[inline]
fn read_u32(bytes: &[u8], at: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[at..at + 4]);
    u32::from_le_bytes(buf)
}

/// Total encoded size for `m` slots at `slots_per_word` slots per word.
#[must_use]
pub fn encoded_len(bit_count: u64, slots_per_word: usize) -> usize {
    HEADER_LEN + payload_len(bit_count, slots_per_word)
}

fn payload_len(bit_count: u64, slots_per_word: usize) -> usize {
    let per_word = slots_per_word as u64;
    let words = bit_count / per_word + u64::from(bit_count % per_word != 0);
    (words as usize).saturating_mul(WORD_BYTES)
}

/// Parse and validate the 29-byte header without touching the payload.
///
/// # Errors
///
/// [`FilterError::CorruptData`] if the buffer is shorter than the header,
/// the version is unknown, or `m`/`k` are out of range.
pub fn read_header(bytes: &[u8]) -> Result<FormatHeader> {
    parse_header(bytes).map_err(FilterError::from)
}

fn parse_header(bytes: &[u8]) -> std::result::Result<FormatHeader, FormatError> {
    if bytes.len() < HEADER_LEN {
        return Err(FormatError::Truncated {
            expected: HEADER_LEN,
            actual: bytes.len(),
        });
    }

    let version = bytes[0];
    if version != FORMAT_VERSION {
        return Err(FormatError::UnsupportedVersion(version));
    }

    let bit_count = read_u64(bytes, 1);
    if bit_count == 0 || bit_count > MAX_BIT_COUNT || usize::try_from(bit_count).is_err() {
        return Err(FormatError::InvalidBitCount(bit_count));
    }

    let hash_count = read_u32(bytes, 9);
    if !(MIN_HASH_COUNT..=MAX_HASH_COUNT).contains(&hash_count) {
        return Err(FormatError::InvalidHashCount(hash_count));
    }

    Ok(FormatHeader {
        version,
        bit_count,
        hash_count,
        seed: read_u64(bytes, 13),
        inserted_count: read_u64(bytes, 21),
    })
}

/// Write `header` and `words` in the format above.
pub(crate) fn encode(header: &FormatHeader, words: &[u64]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(HEADER_LEN + words.len() * WORD_BYTES);

    bytes.push(header.version);
    bytes.extend_from_slice(&header.bit_count.to_le_bytes());
    bytes.extend_from_slice(&header.hash_count.to_le_bytes());
    bytes.extend_from_slice(&header.seed.to_le_bytes());
    bytes.extend_from_slice(&header.inserted_count.to_le_bytes());
    debug_assert_eq!(bytes.len(), HEADER_LEN);

    for word in words {
        bytes.extend_from_slice(&word.to_le_bytes());
    }
    bytes
}

/// Validate `bytes` and split it into header and storage words.
///
/// The payload must be exactly `ceil(m / slots_per_word)` words; both short
/// and overlong inputs are rejected.
pub(crate) fn decode(
    bytes: &[u8],
    slots_per_word: usize,
) -> std::result::Result<(FormatHeader, Vec<u64>), FormatError> {
    let header = parse_header(bytes)?;

    let payload = &bytes[HEADER_LEN..];
    let expected = payload_len(header.bit_count, slots_per_word);
    if payload.len() != expected {
        return Err(FormatError::LengthMismatch {
            expected,
            actual: payload.len(),
        });
    }

    let words = payload
        .chunks_exact(WORD_BYTES)
        .map(|chunk| read_u64(chunk, 0))
        .collect();

    Ok((header, words))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(bit_count: u64, hash_count: u32) -> FormatHeader {
        FormatHeader {
            version: FORMAT_VERSION,
            bit_count,
            hash_count,
            seed: 0x0102_0304_0506_0708,
            inserted_count: 42,
        }
    }

    #[test]
    fn test_byte_layout() {
        let bytes = encode(&header(65, 3), &[1, 0x8000_0000_0000_0000]);
        assert_eq!(bytes.len(), HEADER_LEN + 16);
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[1..9], &65u64.to_le_bytes());
        assert_eq!(&bytes[9..13], &3u32.to_le_bytes());
        assert_eq!(&bytes[13..21], &[8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(&bytes[21..29], &42u64.to_le_bytes());
        assert_eq!(bytes[29], 1);
        assert_eq!(bytes[HEADER_LEN + 15], 0x80);
    }

    #[test]
    fn test_decode_roundtrip() {
        let words = vec![0xdead_beef, 7];
        let bytes = encode(&header(100, 5), &words);
        let (h, w) = decode(&bytes, 64).unwrap();
        assert_eq!(h, header(100, 5));
        assert_eq!(w, words);
    }

    #[test]
    fn test_truncated_header() {
        let err = decode(&[FORMAT_VERSION; 10], 64).unwrap_err();
        assert_eq!(
            err,
            FormatError::Truncated {
                expected: HEADER_LEN,
                actual: 10
            }
        );
        assert!(read_header(&[]).is_err());
    }

    #[test]
    fn test_unknown_version() {
        let mut bytes = encode(&header(64, 3), &[0]);
        bytes[0] = 2;
        assert_eq!(decode(&bytes, 64).unwrap_err(), FormatError::UnsupportedVersion(2));
    }

    #[test]
    fn test_invalid_counts() {
        let bytes = encode(&header(0, 3), &[]);
        assert_eq!(decode(&bytes, 64).unwrap_err(), FormatError::InvalidBitCount(0));

        let bytes = encode(&header(64, 0), &[0]);
        assert_eq!(decode(&bytes, 64).unwrap_err(), FormatError::InvalidHashCount(0));

        let bytes = encode(&header(MAX_BIT_COUNT + 1, 3), &[]);
        assert!(matches!(
            decode(&bytes, 64).unwrap_err(),
            FormatError::InvalidBitCount(_)
        ));
    }

    #[test]
    fn test_payload_must_match_exactly() {
        let bytes = encode(&header(128, 3), &[0, 0]);
        assert!(decode(&bytes[..bytes.len() - 1], 64).is_err());

        let mut longer = bytes.clone();
        longer.extend_from_slice(&[0; 8]);
        assert_eq!(
            decode(&longer, 64).unwrap_err(),
            FormatError::LengthMismatch {
                expected: 16,
                actual: 24
            }
        );
    }

    #[test]
    fn test_word_width_changes_payload() {
        assert_eq!(encoded_len(64, 64), HEADER_LEN + 8);
        assert_eq!(encoded_len(64, 16), HEADER_LEN + 32);
        assert_eq!(encoded_len(1, 16), HEADER_LEN + 8);
    }

    #[test]
    fn test_converts_to_corrupt_data() {
        let err: FilterError = FormatError::UnsupportedVersion(9).into();
        assert!(matches!(err, FilterError::CorruptData { .. }));
        assert!(err.to_string().contains("version 9"));
    }
}

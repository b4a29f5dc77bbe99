//! Membership cache ("bitmap").
//!
//! A fixed-size bit array addressed by a single rolling string hash. It
//! records "this domain was already checked" in one bit per slot.
//!
//! This is deliberately not a multi-hash Bloom filter: two strings that hash
//! to the same slot are indistinguishable, so [`MembershipCache::test`] can
//! return `true` for a string that was never inserted. It never returns
//! `false` for one that was. Keeping the single hash keeps persisted caches
//! readable across versions.
//!
//! # Wire format
//!
//! ```text
//! offset 0  : 4 bytes  magic "DSBM"
//! offset 4  : 1 byte   format version (1)
//! offset 5  : 8 bytes  capacity, u64 little-endian, > 0
//! offset 13 : ceil(capacity / 8) bytes, bit i at byte i / 8, mask 1 << (i % 8)
//! ```

use crate::error::DomainScoutError;
use serde::Serialize;

const MAGIC: &[u8; 4] = b"DSBM";
const FORMAT_VERSION: u8 = 1;
const HEADER_LEN: usize = 4 + 1 + 8;

/// Rolling multiplicative string hash over UTF-16 code units.
///
/// `hash = hash * 31 + unit`, wrapped to a signed 32-bit integer at every
/// step. Matches `String.hashCode()` in Java.
pub fn string_hash(value: &str) -> i32 {
    value
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
}

/// Diagnostic snapshot of a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub capacity: u64,
    pub bits_set: u64,
}

/// Approximate "already checked" set backed by one hash and one bit array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipCache {
    capacity: u64,
    bits: Vec<u8>,
}

impl MembershipCache {
    /// Create an empty cache of `capacity` bits.
    pub fn new(capacity: u64) -> Result<Self, DomainScoutError> {
        if capacity == 0 {
            return Err(DomainScoutError::config(
                "Cache capacity must be greater than zero",
            ));
        }
        let len = byte_len(capacity).ok_or_else(|| {
            DomainScoutError::config(format!("Cache capacity {} is too large", capacity))
        })?;
        Ok(Self {
            capacity,
            bits: vec![0u8; len],
        })
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Slot for `value`: `|string_hash(value)| mod capacity`.
    pub fn slot(&self, value: &str) -> u64 {
        let hash = string_hash(value) as i64;
        hash.unsigned_abs() % self.capacity
    }

    /// Record `value` as checked. Idempotent.
    pub fn insert(&mut self, value: &str) {
        let slot = self.slot(value);
        self.bits[(slot / 8) as usize] |= 1 << (slot % 8);
    }

    /// Whether `value`'s slot is set. May be a false positive.
    pub fn test(&self, value: &str) -> bool {
        let slot = self.slot(value);
        self.bits[(slot / 8) as usize] & (1 << (slot % 8)) != 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            capacity: self.capacity,
            bits_set: self.bits.iter().map(|b| b.count_ones() as u64).sum(),
        }
    }

    /// Encode the cache in the persisted wire format.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.bits.len());
        out.extend_from_slice(MAGIC);
        out.push(FORMAT_VERSION);
        out.extend_from_slice(&self.capacity.to_le_bytes());
        out.extend_from_slice(&self.bits);
        out
    }

    /// Decode a cache from the persisted wire format.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, DomainScoutError> {
        if bytes.len() < HEADER_LEN {
            return Err(DomainScoutError::corrupt_state(format!(
                "expected at least {} header bytes, found {}",
                HEADER_LEN,
                bytes.len()
            )));
        }
        if &bytes[0..4] != MAGIC {
            return Err(DomainScoutError::corrupt_state("missing DSBM magic"));
        }
        if bytes[4] != FORMAT_VERSION {
            return Err(DomainScoutError::corrupt_state(format!(
                "unsupported format version {}",
                bytes[4]
            )));
        }

        let mut raw_capacity = [0u8; 8];
        raw_capacity.copy_from_slice(&bytes[5..HEADER_LEN]);
        let capacity = u64::from_le_bytes(raw_capacity);
        if capacity == 0 {
            return Err(DomainScoutError::corrupt_state("capacity must be positive"));
        }

        let body = &bytes[HEADER_LEN..];
        match byte_len(capacity) {
            Some(expected) if expected == body.len() => {}
            _ => {
                return Err(DomainScoutError::corrupt_state(format!(
                    "capacity {} does not match {} bit bytes",
                    capacity,
                    body.len()
                )))
            }
        }

        // Bits past `capacity` in the last byte are never addressed.
        let used = (capacity % 8) as u32;
        if used != 0 && body.last().is_some_and(|last| last >> used != 0) {
            return Err(DomainScoutError::corrupt_state(format!(
                "padding bits set past capacity {}",
                capacity
            )));
        }

        Ok(Self {
            capacity,
            bits: body.to_vec(),
        })
    }
}

fn byte_len(capacity: u64) -> Option<usize> {
    usize::try_from(capacity.div_ceil(8)).ok()
}

//! Result accumulator
//!
//! A [`Fingerprint`] is four little-endian u64 lanes of a 32-byte hash. Workers
//! merge their hashes into one [`AtomicFingerprint`] with per-lane
//! `fetch_xor`, so the final value does not depend on merge order.

use std::fmt;
use std::ops::{BitXor, BitXorAssign};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Serialize, Serializer};
use uhash_core::HASH_SIZE;

/// Number of 64-bit lanes
pub const LANES: usize = HASH_SIZE / 8;

/// XOR aggregate of hashes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fingerprint(pub [u64; LANES]);

impl Fingerprint {
    /// The identity: merging nothing
    pub const ZERO: Fingerprint = Fingerprint([0; LANES]);

    /// Lanes of a hash, read little-endian
    pub fn from_hash(hash: &[u8; HASH_SIZE]) -> Self {
        let mut lanes = [0u64; LANES];
        for (lane, chunk) in lanes.iter_mut().zip(hash.chunks_exact(8)) {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            *lane = u64::from_le_bytes(word);
        }
        Fingerprint(lanes)
    }

    /// Bytes in hash order
    pub fn to_bytes(&self) -> [u8; HASH_SIZE] {
        let mut bytes = [0u8; HASH_SIZE];
        for (chunk, lane) in bytes.chunks_exact_mut(8).zip(self.0.iter()) {
            chunk.copy_from_slice(&lane.to_le_bytes());
        }
        bytes
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl From<[u8; HASH_SIZE]> for Fingerprint {
    fn from(hash: [u8; HASH_SIZE]) -> Self {
        Self::from_hash(&hash)
    }
}

impl BitXor for Fingerprint {
    type Output = Fingerprint;

    fn bitxor(mut self, rhs: Fingerprint) -> Fingerprint {
        self ^= rhs;
        self
    }
}

impl BitXorAssign for Fingerprint {
    fn bitxor_assign(&mut self, rhs: Fingerprint) {
        for (lane, other) in self.0.iter_mut().zip(rhs.0.iter()) {
            *lane ^= other;
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

impl FromStr for Fingerprint {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; HASH_SIZE];
        hex::decode_to_slice(s.trim(), &mut bytes)?;
        Ok(Self::from_hash(&bytes))
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fingerprint shared by all workers of a run
#[derive(Debug, Default)]
pub struct AtomicFingerprint {
    lanes: [AtomicU64; LANES],
}

impl AtomicFingerprint {
    pub fn new() -> Self {
        Self::default()
    }

    /// XOR `update` into every lane
    #[inline]
    pub fn merge(&self, update: &Fingerprint) {
        for (lane, value) in self.lanes.iter().zip(update.0.iter()) {
            lane.fetch_xor(*value, Ordering::Relaxed);
        }
    }

    /// Current value
    ///
    /// Only meaningful once every merging thread has been joined; the join
    /// orders all merges before this read.
    pub fn read(&self) -> Fingerprint {
        let mut lanes = [0u64; LANES];
        for (out, lane) in lanes.iter_mut().zip(self.lanes.iter()) {
            *out = lane.load(Ordering::Relaxed);
        }
        Fingerprint(lanes)
    }
}

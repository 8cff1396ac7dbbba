//! Run configuration
//!
//! Built once at startup and never mutated; workers only see the values the
//! driver copies out of it.

use uhash_core::EngineFlags;

use crate::error::HarnessError;
use crate::strategy::Strategy;

/// Largest nonce bound: every nonce below it fits the 4-byte field
pub const MAX_NONCES: u64 = 1 << 32;

/// Snapshot of all run parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Flags for shared state allocation
    pub engine: EngineFlags,
    /// Number of worker threads
    pub threads: usize,
    /// Affinity bitmask; worker `i` runs on the `i`-th set bit, 0 = unpinned
    pub affinity: u64,
    /// Threads used for one-time dataset initialization
    pub init_threads: usize,
    /// Exclusive upper bound on hashed nonces
    pub nonces: u64,
    /// Seed for shared state initialization (stored little-endian)
    pub seed: u32,
    pub strategy: Strategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineFlags::default(),
            threads: 1,
            affinity: 0,
            init_threads: 1,
            nonces: 1000,
            seed: 0,
            strategy: Strategy::default(),
        }
    }
}

impl Config {
    /// Check the invariants the driver relies on
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.threads == 0 {
            return Err(HarnessError::Config(
                "thread count must be at least 1".to_string(),
            ));
        }
        if self.init_threads == 0 {
            return Err(HarnessError::Config(
                "init thread count must be at least 1".to_string(),
            ));
        }
        if self.nonces > MAX_NONCES {
            return Err(HarnessError::Config(format!(
                "nonce bound {} exceeds the 32-bit nonce space",
                self.nonces
            )));
        }
        Ok(())
    }

    /// Seed bytes passed to the engine
    pub fn seed_bytes(&self) -> [u8; 4] {
        self.seed.to_le_bytes()
    }
}

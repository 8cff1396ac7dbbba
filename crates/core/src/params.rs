//! UniversalHash engine parameters
//!
//! Sizes are chosen so that a full dataset fits comfortably in memory on a
//! desktop while light mode stays usable on phones.

/// Output size of every hash and commitment
pub const HASH_SIZE: usize = 32;

/// Block size in bytes for memory operations
pub const BLOCK_SIZE: usize = 64;

/// Shared cache size in bytes (1 MB)
pub const CACHE_SIZE: usize = 1024 * 1024;

/// Number of blocks in the shared cache
pub const CACHE_BLOCKS: usize = CACHE_SIZE / BLOCK_SIZE;

/// Number of dataset items (one block each)
pub const DATASET_ITEMS: usize = 1 << 16;

/// Full dataset size in bytes (4 MB)
pub const DATASET_SIZE: usize = DATASET_ITEMS * BLOCK_SIZE;

/// Cache blocks folded into one dataset item
pub const CACHE_ACCESSES: usize = 4;

/// Per-VM scratchpad size in bytes (64 KB)
pub const SCRATCHPAD_SIZE: usize = 64 * 1024;

/// Number of blocks per scratchpad
pub const SCRATCHPAD_BLOCKS: usize = SCRATCHPAD_SIZE / BLOCK_SIZE;

/// Number of mixing rounds per hash
pub const ROUNDS: usize = 512;

/// A dataset item is folded into the round block every this many rounds
pub const DATASET_READ_INTERVAL: usize = 16;

/// Algorithm version
pub const VERSION: u8 = 5;

//! Shared read-only engine state: seed key, cache and optional dataset
//!
//! The state is allocated once, initialized once from a seed and then only
//! read, so any number of VMs may use it concurrently through an `Arc`.

use log::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::AllocError;
use crate::flags::{EngineFlags, Profile};
use crate::mix::{fill_aes, lane};
use crate::params::*;

/// Context string for deriving the cache key from a seed
const CACHE_KEY_CONTEXT: &str = "uhash-core 2025 cache key";

/// Context string for deriving per-input VM seeds
const INPUT_KEY_CONTEXT: &str = "uhash-core 2025 input key";

/// Cache, dataset and keys shared by all VMs of one run
pub struct SharedState {
    flags: EngineFlags,
    /// Key for per-input seeds, derived from the init seed
    input_key: [u8; HASH_SIZE],
    cache: Vec<u8>,
    /// Present only in [`Profile::Full`]
    dataset: Option<Vec<u8>>,
}

impl SharedState {
    /// Allocate cache (and dataset in full mode) without initializing them
    pub fn allocate(flags: EngineFlags) -> Result<Self, AllocError> {
        if flags.jit || flags.secure {
            warn!("JIT/W^X requested; this engine always runs interpreted");
        }
        if flags.large_pages {
            warn!("large pages requested; allocating with regular pages");
        }
        if flags.soft_aes {
            debug!("software AES requested; backend is selected by the aes crate");
        }

        let cache = try_alloc(CACHE_SIZE).ok_or(AllocError::Cache)?;
        let dataset = match flags.profile {
            Profile::Light => None,
            Profile::Full => Some(try_alloc(DATASET_SIZE).ok_or(AllocError::Dataset)?),
        };

        debug!("allocated shared state: {}", flags.profile);
        Ok(Self {
            flags,
            input_key: [0u8; HASH_SIZE],
            cache,
            dataset,
        })
    }

    /// Derive cache contents from the seed; in full mode also build the dataset
    /// using `init_threads` threads
    pub fn initialize(&mut self, seed: &[u8], init_threads: usize) {
        let cache_key = blake3::derive_key(CACHE_KEY_CONTEXT, seed);
        self.input_key = blake3::derive_key(INPUT_KEY_CONTEXT, seed);
        fill_aes(&mut self.cache, &cache_key);

        if let Some(mut dataset) = self.dataset.take() {
            info!(
                "initializing dataset with {} thread(s), {} kernel",
                init_threads.max(1),
                self.flags.init_kernel
            );
            self.fill_dataset(&mut dataset, init_threads.max(1));
            self.dataset = Some(dataset);
        }
    }

    #[cfg(feature = "parallel")]
    fn fill_dataset(&self, dataset: &mut [u8], init_threads: usize) {
        let fill = |dataset: &mut [u8]| {
            dataset
                .par_chunks_mut(BLOCK_SIZE)
                .enumerate()
                .for_each(|(index, item)| {
                    item.copy_from_slice(&derive_item(&self.cache, index as u64));
                });
        };

        match rayon::ThreadPoolBuilder::new()
            .num_threads(init_threads)
            .build()
        {
            Ok(pool) => pool.install(|| fill(dataset)),
            Err(err) => {
                warn!("failed to build init pool ({}), using global pool", err);
                fill(dataset);
            }
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn fill_dataset(&self, dataset: &mut [u8], init_threads: usize) {
        if init_threads > 1 {
            debug!("built without `parallel`; initializing dataset on one thread");
        }
        for (index, item) in dataset.chunks_exact_mut(BLOCK_SIZE).enumerate() {
            item.copy_from_slice(&derive_item(&self.cache, index as u64));
        }
    }

    /// Flags this state was allocated with
    pub fn flags(&self) -> EngineFlags {
        self.flags
    }

    /// Whether a precomputed dataset is present
    pub fn has_dataset(&self) -> bool {
        self.dataset.is_some()
    }

    /// Seed a VM run for `input`
    #[inline]
    pub(crate) fn input_seed(&self, input: &[u8]) -> [u8; HASH_SIZE] {
        let mut hasher = blake3::Hasher::new_keyed(&self.input_key);
        hasher.update(input);
        *hasher.finalize().as_bytes()
    }

    /// Dataset item `index` (modulo the dataset size)
    ///
    /// Full mode reads the precomputed item; light mode derives it from the
    /// cache. Both return identical bytes.
    #[inline]
    pub fn dataset_item(&self, index: u64) -> [u8; BLOCK_SIZE] {
        let index = index % DATASET_ITEMS as u64;
        match &self.dataset {
            Some(dataset) => {
                let offset = index as usize * BLOCK_SIZE;
                let mut item = [0u8; BLOCK_SIZE];
                item.copy_from_slice(&dataset[offset..offset + BLOCK_SIZE]);
                item
            }
            None => derive_item(&self.cache, index),
        }
    }
}

/// Build one dataset item from `CACHE_ACCESSES` dependent cache reads
fn derive_item(cache: &[u8], index: u64) -> [u8; BLOCK_SIZE] {
    let mut state = *blake3::hash(&index.to_le_bytes()).as_bytes();

    for _ in 0..CACHE_ACCESSES {
        let block = (lane(&state, 0) as usize) & (CACHE_BLOCKS - 1);
        let offset = block * BLOCK_SIZE;
        state = *blake3::keyed_hash(&state, &cache[offset..offset + BLOCK_SIZE]).as_bytes();
    }

    let mut item = [0u8; BLOCK_SIZE];
    let mut hasher = blake3::Hasher::new_keyed(&state);
    hasher.update(&index.to_le_bytes());
    hasher.finalize_xof().fill(&mut item);
    item
}

fn try_alloc(size: usize) -> Option<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(size).ok()?;
    buffer.resize(size, 0);
    Some(buffer)
}

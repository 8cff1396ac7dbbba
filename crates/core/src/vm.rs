//! Per-thread hashing VM
//!
//! Each VM owns its scratchpad and reads the shared state through an `Arc`.
//! A hash runs in three phases:
//!
//! 1. Seed: keyed BLAKE3 of the input, then AES expansion into the scratchpad
//! 2. Rounds: address from state, read block, fold a dataset item every
//!    `DATASET_READ_INTERVAL` rounds, apply AES / SHA-256 / BLAKE3 selected by
//!    `(state[0] + round) mod 3`, write back to the same address
//! 3. Finalize: BLAKE3(SHA-256(state || BLAKE3(scratchpad)))

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::mix::{aes_mix, blake3_mix, compute_address, fill_aes, lane, sha256_mix};
use crate::params::*;
use crate::shared::SharedState;

/// Hashing VM bound to one [`SharedState`]
pub struct Vm {
    shared: Arc<SharedState>,
    scratchpad: Vec<u8>,
    /// Seed of the input submitted by the last `hash_first`/`hash_next`
    pending: Option<[u8; HASH_SIZE]>,
}

impl Vm {
    /// Create a VM with a fresh 64 KB scratchpad
    pub fn new(shared: Arc<SharedState>) -> Self {
        Self {
            shared,
            scratchpad: vec![0u8; SCRATCHPAD_SIZE],
            pending: None,
        }
    }

    /// Compute the hash of `input`
    pub fn hash(&mut self, input: &[u8]) -> [u8; HASH_SIZE] {
        let seed = self.shared.input_seed(input);
        self.execute(seed)
    }

    /// Submit the first input of a pipelined stream
    ///
    /// Any input submitted earlier and not collected is discarded.
    pub fn hash_first(&mut self, input: &[u8]) {
        self.pending = Some(self.shared.input_seed(input));
    }

    /// Submit `input` and return the hash of the previously submitted input
    ///
    /// Without a prior submission this behaves like `hash_first` followed by
    /// `hash_last`, except that `input` stays pending.
    pub fn hash_next(&mut self, input: &[u8]) -> [u8; HASH_SIZE] {
        let next = self.shared.input_seed(input);
        let previous = self.pending.replace(next).unwrap_or(next);
        self.execute(previous)
    }

    /// Collect the hash of the pending input without submitting a new one
    pub fn hash_last(&mut self) -> Option<[u8; HASH_SIZE]> {
        let seed = self.pending.take()?;
        Some(self.execute(seed))
    }

    /// Whether an input is waiting to be collected
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn execute(&mut self, seed: [u8; HASH_SIZE]) -> [u8; HASH_SIZE] {
        fill_aes(&mut self.scratchpad, &seed);

        let mut state = seed;
        for round in 0..ROUNDS {
            let addr = compute_address(&state, round);

            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(&self.scratchpad[addr..addr + BLOCK_SIZE]);

            if round % DATASET_READ_INTERVAL == 0 {
                let item = self.shared.dataset_item(lane(&state, 2));
                for (b, i) in block.iter_mut().zip(item.iter()) {
                    *b ^= i;
                }
            }

            let next = match (state[0] as usize + round) % 3 {
                0 => aes_mix(&state, &block),
                1 => sha256_mix(&state, &block),
                _ => blake3_mix(&state, &block),
            };

            // Write back to the address that was read
            self.scratchpad[addr..addr + HASH_SIZE].copy_from_slice(&next);
            state = next;
        }

        self.finalize(&state)
    }

    fn finalize(&self, state: &[u8; HASH_SIZE]) -> [u8; HASH_SIZE] {
        let pad = blake3::hash(&self.scratchpad);
        let sha = Sha256::new()
            .chain_update(state)
            .chain_update(pad.as_bytes())
            .finalize();
        *blake3::hash(&sha).as_bytes()
    }
}

/// Commitment to a hash: BLAKE3(input || hash)
pub fn commitment(input: &[u8], hash: &[u8; HASH_SIZE]) -> [u8; HASH_SIZE] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(input);
    hasher.update(hash);
    *hasher.finalize().as_bytes()
}

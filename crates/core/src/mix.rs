//! Mixing functions shared by cache initialization and the VM rounds
//!
//! Three primitives rotate through the rounds: an AES round pair, SHA-256 and
//! keyed BLAKE3. All of them map `(state, block)` to a new 32-byte state.

use aes::Block;
use aes::hazmat::cipher_round;
use sha2::{Digest, Sha256};

use crate::params::{BLOCK_SIZE, HASH_SIZE, SCRATCHPAD_BLOCKS};

/// Mask for scratchpad address calculation (SCRATCHPAD_BLOCKS - 1)
const ADDRESS_MASK: usize = SCRATCHPAD_BLOCKS - 1;

/// Read the little-endian u64 at lane `index` of a byte slice
#[inline(always)]
pub(crate) fn lane(bytes: &[u8], index: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[index * 8..index * 8 + 8]);
    u64::from_le_bytes(word)
}

/// 4 AES encryption rounds with a single key
#[inline(always)]
pub(crate) fn aes_expand_block(state: &[u8; 16], key: &[u8; 16]) -> [u8; 16] {
    let mut block = Block::from(*state);
    let key = Block::from(*key);

    cipher_round(&mut block, &key);
    cipher_round(&mut block, &key);
    cipher_round(&mut block, &key);
    cipher_round(&mut block, &key);

    let mut out = [0u8; 16];
    out.copy_from_slice(&block);
    out
}

/// Fill a buffer using AES-based expansion of a 32-byte seed
///
///   key   = seed[0:16]
///   state = seed[16:32]
///   each 64-byte block = four successive AES_4Rounds(state, key)
pub(crate) fn fill_aes(buffer: &mut [u8], seed: &[u8; HASH_SIZE]) {
    let mut key = [0u8; 16];
    key.copy_from_slice(&seed[..16]);
    let mut state = [0u8; 16];
    state.copy_from_slice(&seed[16..]);

    for block in buffer.chunks_exact_mut(BLOCK_SIZE) {
        for quarter in block.chunks_exact_mut(16) {
            state = aes_expand_block(&state, &key);
            quarter.copy_from_slice(&state);
        }
    }
}

/// Two AES rounds per state half, keyed by the block
#[inline(always)]
pub(crate) fn aes_mix(state: &[u8; HASH_SIZE], block: &[u8; BLOCK_SIZE]) -> [u8; HASH_SIZE] {
    let mut out = [0u8; HASH_SIZE];
    for (half, chunk) in out.chunks_exact_mut(16).enumerate() {
        let mut s = Block::clone_from_slice(&state[half * 16..half * 16 + 16]);
        let keys = &block[half * 32..half * 32 + 32];
        cipher_round(&mut s, Block::from_slice(&keys[..16]));
        cipher_round(&mut s, Block::from_slice(&keys[16..]));
        chunk.copy_from_slice(&s);
    }
    out
}

/// SHA-256(state || block)
#[inline(always)]
pub(crate) fn sha256_mix(state: &[u8; HASH_SIZE], block: &[u8; BLOCK_SIZE]) -> [u8; HASH_SIZE] {
    let digest = Sha256::new().chain_update(state).chain_update(block).finalize();
    let mut out = [0u8; HASH_SIZE];
    out.copy_from_slice(&digest);
    out
}

/// BLAKE3 keyed by the state over the block
#[inline(always)]
pub(crate) fn blake3_mix(state: &[u8; HASH_SIZE], block: &[u8; BLOCK_SIZE]) -> [u8; HASH_SIZE] {
    *blake3::keyed_hash(state, block).as_bytes()
}

/// Compute scratchpad address from state
///
///   mixed = state[0:8] ⊕ state[8:16] ⊕ rotl64(round, 13) ⊕ (round × 0x517cc1b727220a95)
///   addr  = (mixed mod SCRATCHPAD_BLOCKS) × BLOCK_SIZE
#[inline(always)]
pub(crate) fn compute_address(state: &[u8; HASH_SIZE], round: usize) -> usize {
    const MIXING_CONSTANT: u64 = 0x517cc1b727220a95;

    let round = round as u64;
    let mixed = lane(state, 0)
        ^ lane(state, 1)
        ^ round.rotate_left(13)
        ^ round.wrapping_mul(MIXING_CONSTANT);

    ((mixed as usize) & ADDRESS_MASK) * BLOCK_SIZE
}

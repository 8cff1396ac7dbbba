//! Worker routine
//!
//! A worker claims nonces until the counter passes the bound, hashes the
//! patched template for each one and merges the result into the shared
//! fingerprint. The calling protocol ([`Pipeline`]) and the post-processing
//! step ([`Finish`]) are type parameters, so each of the four combinations
//! compiles to its own loop without per-nonce branching.

use std::sync::Arc;

use log::{debug, warn};

use crate::affinity;
use crate::counter::WorkCounter;
use crate::engine::{Engine, Hash, HashVm};
use crate::fingerprint::{AtomicFingerprint, Fingerprint};
use crate::template::{WorkItem, WorkTemplate};

/// Everything one worker thread owns or shares
pub(crate) struct WorkerContext<E: Engine> {
    pub index: usize,
    pub cpu: Option<usize>,
    pub vm: E::Vm,
    pub counter: Arc<WorkCounter>,
    pub accumulator: Arc<AtomicFingerprint>,
    pub template: Arc<WorkTemplate>,
    pub bound: u64,
}

/// Worker entry point; returns the number of hashes merged
pub(crate) type WorkerFn<E> = fn(WorkerContext<E>) -> u64;

/// How the engine is called for a stream of nonces
///
/// `bound` never exceeds 2^32, so every nonce below it fits the 4-byte field.
pub(crate) trait Pipeline {
    /// Hash every claimed nonce below `bound`, passing `(input, hash)` to `sink`
    fn drive<V, S>(
        vm: &mut V,
        current: &mut WorkItem,
        spare: &mut WorkItem,
        counter: &WorkCounter,
        bound: u64,
        sink: S,
    ) where
        V: HashVm,
        S: FnMut(&[u8], Hash);
}

/// One synchronous `hash` per nonce; claim after computing
pub(crate) enum Single {}

/// Pipelined `hash_first` / `hash_next` / `hash_last`; claim before computing
pub(crate) enum Batched {}

impl Pipeline for Single {
    fn drive<V, S>(
        vm: &mut V,
        current: &mut WorkItem,
        _spare: &mut WorkItem,
        counter: &WorkCounter,
        bound: u64,
        mut sink: S,
    ) where
        V: HashVm,
        S: FnMut(&[u8], Hash),
    {
        let mut nonce = counter.claim();
        while nonce < bound {
            current.set_nonce(nonce as u32);
            let hash = vm.hash(current.as_bytes());
            sink(current.as_bytes(), hash);
            nonce = counter.claim();
        }
    }
}

impl Pipeline for Batched {
    fn drive<V, S>(
        vm: &mut V,
        current: &mut WorkItem,
        spare: &mut WorkItem,
        counter: &WorkCounter,
        bound: u64,
        mut sink: S,
    ) where
        V: HashVm,
        S: FnMut(&[u8], Hash),
    {
        let nonce = counter.claim();
        if nonce >= bound {
            return;
        }
        current.set_nonce(nonce as u32);
        vm.hash_first(current.as_bytes());

        // `current` always holds the input whose hash the next call returns
        loop {
            let next = counter.claim();
            if next < bound {
                spare.set_nonce(next as u32);
                let hash = vm.hash_next(spare.as_bytes());
                sink(current.as_bytes(), hash);
                std::mem::swap(current, spare);
            } else {
                // Drain the last submission; `next` itself is never hashed
                if let Some(hash) = vm.hash_last() {
                    sink(current.as_bytes(), hash);
                }
                return;
            }
        }
    }
}

/// What is merged for each computed hash
pub(crate) trait Finish {
    fn finish<E: Engine>(input: &[u8], hash: Hash) -> Hash;
}

/// Merge the raw hash
pub(crate) enum Raw {}

/// Merge `commitment(input, hash)`
pub(crate) enum Commit {}

impl Finish for Raw {
    #[inline(always)]
    fn finish<E: Engine>(_input: &[u8], hash: Hash) -> Hash {
        hash
    }
}

impl Finish for Commit {
    #[inline(always)]
    fn finish<E: Engine>(input: &[u8], hash: Hash) -> Hash {
        E::commitment(input, &hash)
    }
}

/// Worker loop for one pipeline / finish combination
pub(crate) fn mine<E, P, F>(ctx: WorkerContext<E>) -> u64
where
    E: Engine,
    P: Pipeline,
    F: Finish,
{
    let WorkerContext {
        index,
        cpu,
        mut vm,
        counter,
        accumulator,
        template,
        bound,
    } = ctx;

    if let Some(cpu) = cpu {
        match affinity::bind_current_thread(cpu) {
            Ok(()) => debug!("worker {} pinned to CPU {}", index, cpu),
            Err(err) => warn!("worker {}: {}", index, err),
        }
    }

    let mut current = template.item(0);
    let mut spare = template.item(0);
    let mut hashes = 0u64;

    P::drive(&mut vm, &mut current, &mut spare, &counter, bound, |input, hash| {
        let merged = F::finish::<E>(input, hash);
        accumulator.merge(&Fingerprint::from_hash(&merged));
        hashes += 1;
    });

    debug!("worker {} done: {} hashes", index, hashes);
    hashes
}

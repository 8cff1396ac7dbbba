//! Hashing engine interface consumed by the harness
//!
//! The harness never looks inside the engine. It allocates and initializes
//! the shared state once, hands every worker its own VM and calls one of two
//! hashing protocols. Release and destruction happen on drop.

use std::sync::Arc;

use uhash_core::{AllocError, EngineFlags, SharedState, Vm, HASH_SIZE};

/// Engine output
pub type Hash = [u8; HASH_SIZE];

/// Per-worker execution context
///
/// Owned by exactly one worker thread for its whole lifetime.
pub trait HashVm: Send {
    /// Synchronous hash of `input`
    fn hash(&mut self, input: &[u8]) -> Hash;

    /// Prime the pipeline with `input`
    fn hash_first(&mut self, input: &[u8]);

    /// Submit `input`, return the hash of the previous submission
    fn hash_next(&mut self, input: &[u8]) -> Hash;

    /// Return the hash of the pending submission, if any, without submitting
    fn hash_last(&mut self) -> Option<Hash>;
}

/// Shared, read-only engine state
pub trait Engine: Sized + Send + Sync + 'static {
    type Vm: HashVm + 'static;

    /// Allocate the shared state (fails with the buffer that could not be allocated)
    fn allocate(flags: &EngineFlags) -> Result<Self, AllocError>;

    /// One-time initialization from the seed using `init_threads` threads
    fn initialize(&mut self, seed: &[u8], init_threads: usize);

    /// New execution context reading from `shared`
    fn create_vm(shared: &Arc<Self>) -> Self::Vm;

    /// Commitment transform applied to `hash` of `input`
    fn commitment(input: &[u8], hash: &Hash) -> Hash;
}

impl HashVm for Vm {
    #[inline]
    fn hash(&mut self, input: &[u8]) -> Hash {
        Vm::hash(self, input)
    }

    #[inline]
    fn hash_first(&mut self, input: &[u8]) {
        Vm::hash_first(self, input)
    }

    #[inline]
    fn hash_next(&mut self, input: &[u8]) -> Hash {
        Vm::hash_next(self, input)
    }

    #[inline]
    fn hash_last(&mut self) -> Option<Hash> {
        Vm::hash_last(self)
    }
}

impl Engine for SharedState {
    type Vm = Vm;

    fn allocate(flags: &EngineFlags) -> Result<Self, AllocError> {
        SharedState::allocate(*flags)
    }

    fn initialize(&mut self, seed: &[u8], init_threads: usize) {
        SharedState::initialize(self, seed, init_threads)
    }

    fn create_vm(shared: &Arc<Self>) -> Vm {
        Vm::new(Arc::clone(shared))
    }

    #[inline]
    fn commitment(input: &[u8], hash: &Hash) -> Hash {
        uhash_core::commitment(input, hash)
    }
}

//! Harness errors

use thiserror::Error;
use uhash_core::AllocError;

use crate::fingerprint::Fingerprint;

/// Fatal errors of a benchmark run
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Allocation(#[from] AllocError),

    #[error("failed to spawn worker {index}: {source}")]
    Spawn {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("worker {0} panicked")]
    WorkerPanicked(usize),

    #[error("fingerprint mismatch: expected {expected}, got {actual}")]
    FingerprintMismatch {
        expected: Fingerprint,
        actual: Fingerprint,
    },
}

/// A worker could not be pinned to its CPU; the worker keeps running unpinned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("failed to set thread affinity to CPU {cpu}")]
pub struct AffinityError {
    pub cpu: usize,
}

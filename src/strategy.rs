//! Hashing strategy, selected once per run

use std::fmt;

use serde::Serialize;

use crate::engine::Engine;
use crate::worker::{mine, Batched, Commit, Raw, Single, WorkerFn};

/// Calling protocol and post-processing used by every worker of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Synchronous hash per nonce
    Hash,
    /// Synchronous hash, then commitment
    HashCommit,
    /// Pipelined hashing
    Batch,
    /// Pipelined hashing, then commitment
    BatchCommit,
}

impl Strategy {
    pub fn select(batch: bool, commit: bool) -> Self {
        match (batch, commit) {
            (false, false) => Strategy::Hash,
            (false, true) => Strategy::HashCommit,
            (true, false) => Strategy::Batch,
            (true, true) => Strategy::BatchCommit,
        }
    }

    pub fn is_batched(self) -> bool {
        matches!(self, Strategy::Batch | Strategy::BatchCommit)
    }

    pub fn commits(self) -> bool {
        matches!(self, Strategy::HashCommit | Strategy::BatchCommit)
    }

    /// Worker loop specialized for this strategy
    pub(crate) fn worker_fn<E: Engine>(self) -> WorkerFn<E> {
        match self {
            Strategy::Hash => mine::<E, Single, Raw>,
            Strategy::HashCommit => mine::<E, Single, Commit>,
            Strategy::Batch => mine::<E, Batched, Raw>,
            Strategy::BatchCommit => mine::<E, Batched, Commit>,
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Batch
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Hash => "hash",
            Strategy::HashCommit => "hash + commitment",
            Strategy::Batch => "batched hash",
            Strategy::BatchCommit => "batched hash + commitment",
        };
        f.write_str(name)
    }
}

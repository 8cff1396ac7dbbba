//! # UniversalHash Keyed Engine
//!
//! The engine behind the uhash nonce benchmark. A seed initializes a shared,
//! read-only state once; every hashing thread then owns a [`Vm`] that reads
//! from it.
//!
//! ## Profiles
//!
//! - **Light**: 1 MB cache, dataset items derived on demand (verification)
//! - **Full**: cache plus a precomputed 4 MB dataset (mining)
//!
//! Both profiles produce identical hashes for the same seed and input.
//!
//! ## Calling conventions
//!
//! - [`Vm::hash`]: synchronous, returns the hash of its input
//! - [`Vm::hash_first`] / [`Vm::hash_next`] / [`Vm::hash_last`]: pipelined,
//!   `hash_next` returns the hash of the previous submission
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use uhash_core::{EngineFlags, SharedState, Vm, commitment};
//!
//! let mut state = SharedState::allocate(EngineFlags::default()).unwrap();
//! state.initialize(&0u32.to_le_bytes(), 1);
//!
//! let mut vm = Vm::new(Arc::new(state));
//! let hash = vm.hash(b"block template");
//! let committed = commitment(b"block template", &hash);
//! assert_ne!(hash, committed);
//! ```

mod error;
mod flags;
mod mix;
mod params;
mod shared;
mod vm;

pub use error::AllocError;
pub use flags::{CpuFeatures, EngineFlags, InitKernel, Profile};
pub use params::*;
pub use shared::SharedState;
pub use vm::{Vm, commitment};

#[cfg(test)]
mod tests;

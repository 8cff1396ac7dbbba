//! UniversalHash Nonce Benchmark
//!
//! Drives the UniversalHash engine over a range of nonces on any number of
//! threads and reduces every hash into one fingerprint.
//!
//! # Overview
//!
//! - **Work allocation**: one shared atomic counter hands out each nonce
//!   exactly once
//! - **Accumulation**: hashes are XORed into a 256-bit fingerprint lane by
//!   lane, so the result is independent of thread count and scheduling
//! - **Strategies**: single-shot or pipelined engine calls, with or without
//!   the commitment transform
//! - **No locks** on the hot path: `fetch_add` and `fetch_xor` only
//!
//! # Example
//!
//! ```rust
//! use uhash_bench::{run, Config, Strategy};
//! use uhash_core::SharedState;
//!
//! let single = Config { nonces: 8, strategy: Strategy::Hash, ..Config::default() };
//! let batched = Config { nonces: 8, threads: 4, ..Config::default() };
//!
//! let a = run::<SharedState>(single).unwrap();
//! let b = run::<SharedState>(batched).unwrap();
//! assert_eq!(a.fingerprint, b.fingerprint);
//! ```

pub mod affinity;
pub mod config;
pub mod counter;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod harness;
pub mod parity;
pub mod report;
pub mod strategy;
pub mod template;
mod worker;

#[cfg(feature = "cli")]
pub mod cli;

// Convenience re-exports
pub use config::Config;
pub use counter::WorkCounter;
pub use engine::{Engine, Hash, HashVm};
pub use error::{AffinityError, HarnessError};
pub use fingerprint::{AtomicFingerprint, Fingerprint};
pub use harness::{run, Harness, Phase, ReadyHarness};
pub use report::Report;
pub use strategy::Strategy;
pub use template::{WorkItem, WorkTemplate};

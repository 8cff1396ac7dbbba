//! Atomic work allocator
//!
//! Workers claim nonces from one shared counter. Each claim is a single
//! `fetch_add`, so values are unique and issued in increasing order; the order
//! in which workers consume them is unspecified.

use std::sync::atomic::{AtomicU64, Ordering};

/// Shared nonce counter
#[derive(Debug, Default)]
pub struct WorkCounter {
    next: AtomicU64,
}

impl WorkCounter {
    /// Counter issuing 0, 1, 2, ...
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter whose first claim returns `offset`
    pub fn starting_at(offset: u64) -> Self {
        Self {
            next: AtomicU64::new(offset),
        }
    }

    /// Claim the next value
    ///
    /// Relaxed is enough: the only cross-thread contract is uniqueness, which
    /// the atomic read-modify-write guarantees on its own.
    #[inline]
    pub fn claim(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// The value the next claim would return
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

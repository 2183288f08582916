//! # Virtual Clock
//!
//! Deterministic logical time for simulation and audit timestamps.
//!
//! ## Expectations:
//! - Nanosecond resolution
//! - Seedable and deterministic
//! - Monotonically non-decreasing, lock-free

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A simple virtual clock that advances in nanoseconds.
///
/// Clones share the same underlying counter, so the simulation driver and the
/// enforcement engine observe the same logical time.
#[derive(Clone)]
pub struct VirtualClock {
    offset: Arc<AtomicU64>,
}

impl VirtualClock {
    /// Creates a new virtual clock starting at `seed` nanoseconds.
    pub fn new(seed: u64) -> Self {
        Self {
            offset: Arc::new(AtomicU64::new(seed)),
        }
    }

    /// Returns the current virtual time in nanoseconds.
    #[inline]
    pub fn now_ns(&self) -> u64 {
        self.offset.load(Ordering::Acquire)
    }

    /// Current virtual time in seconds, for human-facing audit output.
    #[inline]
    pub fn now_secs(&self) -> f64 {
        self.now_ns() as f64 / 1e9
    }

    /// Advances the clock by the given number of nanoseconds.
    #[inline]
    pub fn advance(&self, ns: u64) {
        self.offset.fetch_add(ns, Ordering::Release);
    }
}

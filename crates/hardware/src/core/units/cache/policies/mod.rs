//! TLB Replacement Policies.
//!
//! Implements the algorithms that pick the victim way when a translation is
//! written into a full set.
//!
//! # Policies
//!
//! - `Plru`: Pseudo-LRU (tree-based), one tree per set.
//! - `Lfsr`: Pseudo-random selection from a free-running LFSR.

/// Pseudo-random (LFSR) replacement policy.
pub mod lfsr;

/// Pseudo-LRU (tree-based) replacement policy.
pub mod plru;

use std::fmt::Debug;

pub use lfsr::{Lfsr, LfsrPolicy};
pub use plru::{Plru, PlruPolicy};

/// Trait for way replacement policies.
///
/// Defines the interface for updating usage state and selecting victim ways.
/// Victim selection is a pure read; only `update` and `tick` change state.
pub trait ReplacementPolicy: Send + Sync + Debug {
    /// Records an access to a way.
    ///
    /// # Arguments
    ///
    /// * `set` - The set index.
    /// * `way` - The way within the set that was accessed.
    fn update(&mut self, set: usize, way: usize);

    /// Selects the way to evict from a set.
    ///
    /// # Arguments
    ///
    /// * `set` - The set index.
    ///
    /// # Returns
    ///
    /// The index of the way to evict.
    fn get_victim(&self, set: usize) -> usize;

    /// Advances free-running state by one clock.
    fn tick(&mut self) {}

    /// Returns the policy to its reset state.
    fn reset(&mut self);
}

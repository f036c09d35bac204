//! TLB functional units.
//!
//! This module contains the content addressable memory, the set-associative
//! translation cache built on it, and the memory management blocks that use
//! the cache.

/// Content addressable memory entries, array and address encoder.
pub mod cam;

/// Set-associative translation cache with replacement policies.
pub mod cache;

/// PTE layout, permission validation, secondary table and TLB controller.
pub mod mmu;

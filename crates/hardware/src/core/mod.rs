//! Clocked hardware blocks.
//!
//! This module contains the TLB's storage and control blocks and the
//! [`Clocked`](traits::Clocked) trait they share.

/// Clock-edge interface.
pub mod traits;

/// CAM, cache, and MMU units.
pub mod units;

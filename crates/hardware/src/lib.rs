//! Cycle-level RISC-V TLB model.
//!
//! This crate models the translation lookaside buffer of a RISC-V core at
//! clock-edge granularity, with the following:
//! 1. **CAM:** Content addressable entries with registered match, a fully associative `Cam`, and the priority/one-hot address encoder.
//! 2. **Cache:** The set-associative walker with tree pseudo-LRU or LFSR replacement.
//! 3. **MMU:** PTE layout, the permission validator, the direct-mapped secondary table, and the TLB controller.
//! 4. **Support:** Configuration, statistics, and the addressed register file.
//!
//! Every stateful block implements [`Clocked`]: `tick` samples the inputs and
//! commits the next state on one edge, `output` reads the registered outputs.
//!
//! ```
//! use rvsim_tlb::{Clocked, Tlb, TlbConfig, TlbRequest};
//! use rvsim_tlb::common::Xwr;
//! use rvsim_tlb::core::units::mmu::pte::PageTableEntry;
//!
//! let mut tlb = Tlb::new(&TlbConfig::default()).unwrap();
//! let pte = PageTableEntry::default().with_valid(true).with_xwr(Xwr::R).with_user(true);
//!
//! let _ = tlb.step(&TlbRequest::write_l1(0x1234, 7, pte));
//! let response = tlb.step(&TlbRequest::search(0x1234, 7, Xwr::R));
//! assert!(response.hit && response.valid);
//! assert_eq!(response.pte_out, pte);
//! ```

/// Common types and constants (addresses, access descriptors, errors, register file).
pub mod common;
/// TLB configuration (defaults, replacement policy, geometry).
pub mod config;
/// Clocked hardware blocks (CAM, cache, MMU).
pub mod core;
/// TLB statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `TlbConfig::default()` or deserialize from JSON.
pub use crate::config::TlbConfig;
/// Clock-edge interface shared by every stateful block.
pub use crate::core::traits::Clocked;
/// TLB controller and its command interface.
pub use crate::core::units::mmu::tlb::{Tlb, TlbCommand, TlbRequest, TlbResponse};
/// Activity counters.
pub use crate::stats::TlbStats;

//! Common utilities and types used throughout the TLB model.
//!
//! This module provides the building blocks shared by every hardware block. It includes:
//! 1. **Address Types:** The strong VMA type and its set/tag decomposition.
//! 2. **Signal Widths:** Masking and `clog2` helpers for fixed-width registers.
//! 3. **Constants:** PTE bit layout, command encodings and model limits.
//! 4. **Access Descriptors:** XWR triples and the requester's privilege/ASID bundle.
//! 5. **Error Handling:** Configuration errors and fault classification.
//! 6. **Register Storage:** An addressed register file with registered reads.

/// Virtual memory address type and decomposition.
pub mod addr;

/// Bit-width helpers.
pub mod bits;

/// Fixed encodings and limits.
pub mod constants;

/// Access descriptor types.
pub mod data;

/// Error types and fault definitions.
pub mod error;

/// Addressed register file.
pub mod reg;

pub use addr::{VirtAddr, VmaSplit};
pub use data::{AccessRequest, AccessType, Xwr};
pub use error::{ConfigError, PermissionFault, TlbFault};
pub use reg::{RegisterFile, RegisterFileInput, RegisterFileOutput};

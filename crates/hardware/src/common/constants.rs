//! Global TLB Constants.
//!
//! This module defines the fixed encodings shared across the TLB model. It includes:
//! 1. **PTE Layout:** Bit positions of the permission and status flags in a page table entry.
//! 2. **Command Encodings:** The 2-bit control words driven into CAM entries and the controller.
//! 3. **Hardware Limits:** Upper bounds on signal widths the model can carry.

/// Bit position of the valid (V) flag in a page table entry.
pub const PTE_VALID_BIT: u32 = 0;

/// Bit position of the least significant XWR flag (R) in a page table entry.
pub const PTE_XWR_SHIFT: u32 = 1;

/// Width of the XWR permission field.
pub const PTE_XWR_WIDTH: u32 = 3;

/// Bit position of the user (U) flag in a page table entry.
pub const PTE_USER_BIT: u32 = 4;

/// Bit position of the global (G) flag in a page table entry.
pub const PTE_GLOBAL_BIT: u32 = 5;

/// Bit position of the accessed (A) flag in a page table entry.
pub const PTE_ACCESSED_BIT: u32 = 6;

/// Bit position of the dirty (D) flag in a page table entry.
pub const PTE_DIRTY_BIT: u32 = 7;

/// Number of low PTE bits occupied by flags (V, XWR, U, G, A, D).
pub const PTE_FLAG_BITS: u32 = 8;

/// Read permission bit inside the XWR triple.
pub const XWR_READ: u8 = 0b001;

/// Write permission bit inside the XWR triple.
pub const XWR_WRITE: u8 = 0b010;

/// Execute permission bit inside the XWR triple.
pub const XWR_EXECUTE: u8 = 0b100;

/// Width of every command bus in the design.
pub const COMMAND_BITS: u32 = 2;

/// Maximum key (tag) width a CAM entry can hold.
pub const MAX_KEY_BITS: u32 = 64;

/// Maximum stored word width (ASID + PTE) a CAM entry can hold.
pub const MAX_DATA_BITS: u32 = 128;

/// Maximum width of a match vector, and therefore of ways per set or CAM entries.
pub const MAX_MATCH_WIDTH: usize = 64;

/// Maximum PTE width.
pub const MAX_PTE_BITS: u32 = 64;

/// Maximum ASID width.
pub const MAX_ASID_BITS: u32 = 32;

/// Width of the controller `mode` field (enough to select Sv48 on RV64).
pub const MODE_BITS: u32 = 4;

/// `mode` value that disables translation entirely.
pub const MODE_BARE: u8 = 0;

/// `mode` value for Sv39 paging, the default for request builders.
pub const MODE_SV39: u8 = 8;

//! Memory Management Unit (MMU) blocks.
//!
//! This module holds the translation-specific parts of the TLB:
//! 1. **PTE:** Page table entry fields and the packed `{asid, pte}` word layout.
//! 2. **Permission:** The validator judging a matched entry against a request.
//! 3. **Backing:** The direct-mapped secondary table behind `WRITE_L2`.
//! 4. **TLB:** The controller sequencing commands across both tables.

/// Direct-mapped secondary translation table.
pub mod backing;

/// Permission validator.
pub mod permission;

/// Page table entry and stored word layout.
pub mod pte;

/// Translation Lookaside Buffer (TLB) controller.
pub mod tlb;

pub use self::backing::{BackingCommand, BackingLookup, BackingTable};
pub use self::permission::PermissionValidator;
pub use self::pte::{EntryLayout, PageTableEntry, TranslationEntry};
pub use self::tlb::{Tlb, TlbCommand, TlbRequest, TlbResponse};

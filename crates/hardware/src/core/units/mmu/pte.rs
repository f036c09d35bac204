//! Page Table Entry (PTE) layout.
//!
//! This module fixes the bit layout of the translation payload stored per TLB
//! slot. It provides:
//! 1. **Field Extraction:** Valid, XWR, user, global, accessed and dirty flags.
//! 2. **Stored Word Packing:** The `{asid, pte}` word held in a CAM entry.
//!
//! ```text
//!  stored word:  | asid (asid_bits) | pte (pte_bits)                      |
//!  pte:          | payload ... | D7 | A6 | G5 | U4 | X3 W2 R1 | V0 |
//! ```
//!
//! The accessed and dirty bits are maintained by the page-table walker; the
//! TLB only reads them.

use std::fmt;

use crate::common::bits::{bit, field, mask_u64, mask_u128};
use crate::common::constants::{
    MAX_ASID_BITS, MAX_PTE_BITS, PTE_ACCESSED_BIT, PTE_DIRTY_BIT, PTE_FLAG_BITS, PTE_GLOBAL_BIT,
    PTE_USER_BIT, PTE_VALID_BIT, PTE_XWR_SHIFT, PTE_XWR_WIDTH,
};
use crate::common::data::Xwr;
use crate::common::error::ConfigError;

/// A raw page table entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PageTableEntry(pub u64);

impl PageTableEntry {
    /// Wraps raw PTE bits.
    #[inline(always)]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw PTE bits.
    #[inline(always)]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Valid (V) flag.
    pub const fn valid(self) -> bool {
        bit(self.0, PTE_VALID_BIT)
    }

    /// Execute/write/read triple.
    pub const fn xwr(self) -> Xwr {
        Xwr::from_bits(field(self.0, PTE_XWR_SHIFT, PTE_XWR_WIDTH) as u8)
    }

    /// User (U) flag: usable from user mode.
    pub const fn user(self) -> bool {
        bit(self.0, PTE_USER_BIT)
    }

    /// Global (G) flag: ignores the ASID comparison.
    pub const fn global(self) -> bool {
        bit(self.0, PTE_GLOBAL_BIT)
    }

    /// Accessed (A) flag.
    pub const fn accessed(self) -> bool {
        bit(self.0, PTE_ACCESSED_BIT)
    }

    /// Dirty (D) flag.
    pub const fn dirty(self) -> bool {
        bit(self.0, PTE_DIRTY_BIT)
    }

    /// Bits above the flag byte (physical page number and software bits).
    pub const fn payload(self) -> u64 {
        self.0 >> PTE_FLAG_BITS
    }

    const fn with_bit(self, index: u32, set: bool) -> Self {
        if set {
            Self(self.0 | (1 << index))
        } else {
            Self(self.0 & !(1 << index))
        }
    }

    /// Returns a copy with the valid flag set or cleared.
    pub const fn with_valid(self, valid: bool) -> Self {
        self.with_bit(PTE_VALID_BIT, valid)
    }

    /// Returns a copy with the XWR triple replaced.
    pub const fn with_xwr(self, xwr: Xwr) -> Self {
        let cleared = self.0 & !(mask_u64(PTE_XWR_WIDTH) << PTE_XWR_SHIFT);
        Self(cleared | ((xwr.bits() as u64) << PTE_XWR_SHIFT))
    }

    /// Returns a copy with the user flag set or cleared.
    pub const fn with_user(self, user: bool) -> Self {
        self.with_bit(PTE_USER_BIT, user)
    }

    /// Returns a copy with the global flag set or cleared.
    pub const fn with_global(self, global: bool) -> Self {
        self.with_bit(PTE_GLOBAL_BIT, global)
    }

    /// Returns a copy with the accessed flag set or cleared.
    pub const fn with_accessed(self, accessed: bool) -> Self {
        self.with_bit(PTE_ACCESSED_BIT, accessed)
    }

    /// Returns a copy with the dirty flag set or cleared.
    pub const fn with_dirty(self, dirty: bool) -> Self {
        self.with_bit(PTE_DIRTY_BIT, dirty)
    }

    /// Returns a copy with the payload replaced.
    pub const fn with_payload(self, payload: u64) -> Self {
        Self((self.0 & mask_u64(PTE_FLAG_BITS)) | (payload << PTE_FLAG_BITS))
    }
}

impl fmt::Display for PageTableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |set: bool, c: char| if set { c } else { '-' };
        write!(
            f,
            "{:#x} [{}{}{}{}{}{}]",
            self.payload(),
            flag(self.dirty(), 'd'),
            flag(self.accessed(), 'a'),
            flag(self.global(), 'g'),
            flag(self.user(), 'u'),
            self.xwr(),
            flag(self.valid(), 'v'),
        )
    }
}

/// A translation as held by one TLB slot: the PTE and the owning ASID.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TranslationEntry {
    /// The page table entry.
    pub pte: PageTableEntry,
    /// Address space the entry was installed for.
    pub asid: u32,
}

/// Widths of the stored `{asid, pte}` word.
///
/// `asid_bits + pte_bits` is exactly the width of the stored word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryLayout {
    asid_bits: u32,
    pte_bits: u32,
}

impl EntryLayout {
    /// Creates a layout.
    ///
    /// # Arguments
    ///
    /// * `asid_bits` - ASID width (1..=32).
    /// * `pte_bits` - PTE width (8..=64, the flag byte must fit).
    pub fn new(asid_bits: u32, pte_bits: u32) -> Result<Self, ConfigError> {
        if asid_bits == 0 {
            return Err(ConfigError::Zero { what: "asid_bits" });
        }
        if asid_bits > MAX_ASID_BITS {
            return Err(ConfigError::TooLarge {
                what: "asid_bits",
                value: asid_bits as usize,
                max: MAX_ASID_BITS as usize,
            });
        }
        if pte_bits < PTE_FLAG_BITS {
            return Err(ConfigError::TooSmall {
                what: "pte_bits",
                value: pte_bits as usize,
                min: PTE_FLAG_BITS as usize,
            });
        }
        if pte_bits > MAX_PTE_BITS {
            return Err(ConfigError::TooLarge {
                what: "pte_bits",
                value: pte_bits as usize,
                max: MAX_PTE_BITS as usize,
            });
        }
        Ok(Self {
            asid_bits,
            pte_bits,
        })
    }

    /// ASID width.
    pub const fn asid_bits(&self) -> u32 {
        self.asid_bits
    }

    /// PTE width.
    pub const fn pte_bits(&self) -> u32 {
        self.pte_bits
    }

    /// Width of the stored word.
    pub const fn word_bits(&self) -> u32 {
        self.asid_bits + self.pte_bits
    }

    /// Truncates an ASID to the configured width.
    pub const fn truncate_asid(&self, asid: u32) -> u32 {
        (asid as u64 & mask_u64(self.asid_bits)) as u32
    }

    /// Truncates a PTE to the configured width.
    pub const fn truncate_pte(&self, pte: PageTableEntry) -> PageTableEntry {
        PageTableEntry(pte.0 & mask_u64(self.pte_bits))
    }

    /// Concatenates `{asid, pte}` into a stored word, PTE in the low bits.
    pub const fn pack(&self, entry: TranslationEntry) -> u128 {
        let pte = self.truncate_pte(entry.pte).0 as u128;
        let asid = self.truncate_asid(entry.asid) as u128;
        (asid << self.pte_bits) | pte
    }

    /// Splits a stored word back into its PTE and ASID.
    pub const fn unpack(&self, word: u128) -> TranslationEntry {
        let word = word & mask_u128(self.word_bits());
        TranslationEntry {
            pte: PageTableEntry((word & mask_u128(self.pte_bits)) as u64),
            asid: (word >> self.pte_bits) as u32,
        }
    }
}

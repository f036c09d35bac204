//! Virtual Memory Address type.
//!
//! This module defines the strong type for the VMA presented to the TLB and the
//! way it is cut into cache coordinates. It provides the following:
//! 1. **Type Safety:** Keeps raw VMAs apart from tags, set indices and stored words.
//! 2. **Address Decomposition:** Splits a VMA into `{tag, set}` for a given geometry.

use super::bits::mask_u64;

/// A virtual memory address (VMA) as driven onto the TLB input bus.
///
/// The value is the page-granular address the requester wants translated; the
/// TLB never looks at a page offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtAddr(pub u64);

/// A VMA cut into set-associative cache coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VmaSplit {
    /// High bits compared against the stored CAM key.
    pub tag: u64,
    /// Low bits selecting the set.
    pub set: usize,
}

impl VirtAddr {
    /// Creates a new virtual address from a raw 64-bit value.
    ///
    /// # Arguments
    ///
    /// * `addr` - The raw 64-bit address value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }

    /// Truncates the address to the width of the VMA bus.
    ///
    /// # Arguments
    ///
    /// * `vma_bits` - Width of the VMA input signal.
    #[inline(always)]
    pub const fn truncate(self, vma_bits: u32) -> Self {
        Self(self.0 & mask_u64(vma_bits))
    }

    /// Splits the address into a set index and a tag.
    ///
    /// The low `set_bits` bits select the set and the following `tag_bits`
    /// bits form the tag. With `set_bits == 0` the cache has a single set and
    /// the whole address is the tag.
    ///
    /// # Arguments
    ///
    /// * `set_bits` - `ceil(log2(set_count))`.
    /// * `tag_bits` - Width of the stored key.
    ///
    /// # Returns
    ///
    /// The `{tag, set}` pair.
    #[inline]
    pub const fn split(self, set_bits: u32, tag_bits: u32) -> VmaSplit {
        let set = (self.0 & mask_u64(set_bits)) as usize;
        let tag = if set_bits >= u64::BITS {
            0
        } else {
            (self.0 >> set_bits) & mask_u64(tag_bits)
        };
        VmaSplit { tag, set }
    }
}

impl From<u64> for VirtAddr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

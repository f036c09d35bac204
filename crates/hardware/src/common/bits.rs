//! Signal-width helpers.
//!
//! Every register in the TLB model has a fixed bit width. Values are carried in
//! native integers (`u64` for keys and match vectors, `u128` for stored words)
//! and masked down to the declared width whenever they cross a register
//! boundary, the same way an HDL signal truncates on assignment.

/// Returns a mask with the low `width` bits set.
///
/// Widths of 64 or more saturate to `u64::MAX`.
#[inline(always)]
pub const fn mask_u64(width: u32) -> u64 {
    if width >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Returns a mask with the low `width` bits set, for 128-bit stored words.
#[inline(always)]
pub const fn mask_u128(width: u32) -> u128 {
    if width >= u128::BITS {
        u128::MAX
    } else {
        (1u128 << width) - 1
    }
}

/// Number of address bits needed to select one of `count` items.
///
/// This is `ceil(log2(count))`, with `clog2(0) == clog2(1) == 0`.
#[inline]
pub const fn clog2(count: usize) -> u32 {
    if count <= 1 {
        0
    } else {
        usize::BITS - (count - 1).leading_zeros()
    }
}

/// Extracts `width` bits of `value` starting at bit `lsb`.
#[inline(always)]
pub const fn field(value: u64, lsb: u32, width: u32) -> u64 {
    (value >> lsb) & mask_u64(width)
}

/// Returns bit `index` of `value`.
#[inline(always)]
pub const fn bit(value: u64, index: u32) -> bool {
    (value >> index) & 1 != 0
}

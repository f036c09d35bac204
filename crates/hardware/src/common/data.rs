//! Memory Access Descriptors.
//!
//! This module defines how a requester describes the access it wants translated.
//! These types are used for the following:
//! 1. **Permission Validation:** The requested XWR triple compared against the stored PTE.
//! 2. **Privilege Checks:** Supervisor mode and the supervisor-user-memory (SUM) flag.
//! 3. **Address Space Tagging:** The ASID the requester is running under.

use std::fmt;

use super::constants::{XWR_EXECUTE, XWR_READ, XWR_WRITE};

/// Type of memory access operation.
///
/// Used by fetch and load/store collaborators to build the XWR triple they
/// present to the TLB.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Instruction fetch access. Requests Execute (X).
    Fetch,

    /// Data read access. Requests Read (R).
    Read,

    /// Data write access. Requests Write (W).
    Write,
}

/// Execute/Write/Read permission triple.
///
/// Bit 0 is R, bit 1 is W, bit 2 is X, matching bits 1..=3 of a page table
/// entry shifted down by one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Xwr(u8);

impl Xwr {
    /// No permissions.
    pub const NONE: Self = Self(0);
    /// Read only.
    pub const R: Self = Self(XWR_READ);
    /// Read and write.
    pub const RW: Self = Self(XWR_READ | XWR_WRITE);
    /// Execute only.
    pub const X: Self = Self(XWR_EXECUTE);
    /// Read and execute.
    pub const RX: Self = Self(XWR_READ | XWR_EXECUTE);
    /// Read, write and execute.
    pub const RWX: Self = Self(XWR_READ | XWR_WRITE | XWR_EXECUTE);

    /// Builds the triple from its 3-bit encoding; higher bits are discarded.
    #[inline(always)]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b111)
    }

    /// Returns the 3-bit encoding.
    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Read permission.
    pub const fn read(self) -> bool {
        self.0 & XWR_READ != 0
    }

    /// Write permission.
    pub const fn write(self) -> bool {
        self.0 & XWR_WRITE != 0
    }

    /// Execute permission.
    pub const fn execute(self) -> bool {
        self.0 & XWR_EXECUTE != 0
    }
}

impl From<AccessType> for Xwr {
    fn from(access: AccessType) -> Self {
        match access {
            AccessType::Fetch => Self::X,
            AccessType::Read => Self::R,
            AccessType::Write => Self::from_bits(XWR_WRITE),
        }
    }
}

impl fmt::Display for Xwr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = if self.execute() { 'x' } else { '-' };
        let w = if self.write() { 'w' } else { '-' };
        let r = if self.read() { 'r' } else { '-' };
        write!(f, "{x}{w}{r}")
    }
}

/// The access descriptor presented alongside a VMA.
///
/// Held stable by the requester for the cycle in which the search result is
/// sampled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessRequest {
    /// Requested execute/write/read class.
    pub xwr: Xwr,
    /// Requester runs in supervisor mode.
    pub supervisor: bool,
    /// Supervisor may touch user pages (sstatus.SUM).
    pub supervisor_access: bool,
    /// Address space identifier of the requester.
    pub asid: u32,
}

impl AccessRequest {
    /// Creates a user-mode request for the given permissions and ASID.
    pub const fn user(xwr: Xwr, asid: u32) -> Self {
        Self {
            xwr,
            supervisor: false,
            supervisor_access: false,
            asid,
        }
    }

    /// Creates a supervisor-mode request for the given permissions and ASID.
    pub const fn supervisor(xwr: Xwr, asid: u32, supervisor_access: bool) -> Self {
        Self {
            xwr,
            supervisor: true,
            supervisor_access,
            asid,
        }
    }
}

//! Error and Fault definitions.
//!
//! This module defines the error handling and fault classification for the TLB model. It provides:
//! 1. **Configuration Errors:** Rejected geometries and unreadable configuration sources.
//! 2. **Permission Faults:** The reason a tag match was denied by the permission validator.
//! 3. **Lookup Faults:** Miss, aliasing and permission outcomes derived from the output signals.
//!
//! Only construction can fail. Clocked operations always complete, and faults
//! are surfaced as output flags that a consumer classifies after the fact.

use thiserror::Error;

/// Errors raised while building a hardware block from its configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A size parameter that must be non-zero was zero.
    #[error("{what} must be non-zero")]
    Zero {
        /// Name of the offending parameter.
        what: &'static str,
    },

    /// A size parameter that must be a power of two was not.
    #[error("{what} must be a power of two (got {value})")]
    NotPowerOfTwo {
        /// Name of the offending parameter.
        what: &'static str,
        /// The rejected value.
        value: usize,
    },

    /// A width or count exceeded what the model can carry.
    #[error("{what} is {value}, above the supported maximum of {max}")]
    TooLarge {
        /// Name of the offending parameter.
        what: &'static str,
        /// The rejected value.
        value: usize,
        /// Largest accepted value.
        max: usize,
    },

    /// A width was below the minimum the layout needs.
    #[error("{what} is {value}, below the required minimum of {min}")]
    TooSmall {
        /// Name of the offending parameter.
        what: &'static str,
        /// The rejected value.
        value: usize,
        /// Smallest accepted value.
        min: usize,
    },

    /// Entry count is not a whole number of sets.
    #[error("{entries} entries cannot be distributed across {ways} ways")]
    UnevenSets {
        /// Total entries requested.
        entries: usize,
        /// Associativity requested.
        ways: usize,
    },

    /// The configuration text was not valid JSON for this schema.
    #[error("configuration parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reason a stored PTE rejected the requested access.
///
/// Variants are listed in the order the validator tests them; the first
/// failing check is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PermissionFault {
    /// The PTE valid bit is clear.
    #[error("page table entry is not valid")]
    NotValid,

    /// ASID differs and the entry is not global.
    #[error("ASID mismatch (entry {entry:#x}, requested {requested:#x})")]
    AsidMismatch {
        /// ASID stored with the entry.
        entry: u32,
        /// ASID presented by the requester.
        requested: u32,
    },

    /// Requested XWR triple is not exactly the stored triple.
    #[error("XWR mismatch (entry {entry:#05b}, requested {requested:#05b})")]
    XwrMismatch {
        /// Stored XWR bits.
        entry: u8,
        /// Requested XWR bits.
        requested: u8,
    },

    /// Supervisor touched a user page without supervisor access.
    #[error("supervisor access to user page without SUM")]
    SupervisorDenied,

    /// User mode touched a supervisor-only page.
    #[error("user access to supervisor page")]
    UserDenied,
}

/// Classification of a TLB search outcome that did not produce a usable PTE.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TlbFault {
    /// No way held the tag; an external page-table walker must refill.
    #[error("TLB miss")]
    Miss,

    /// More than one way in a set held the tag. Never expected under correct
    /// write discipline.
    #[error("aliasing fault in set {set} (match vector {matches:#b})")]
    Aliasing {
        /// The set that was searched.
        set: usize,
        /// The raw match vector.
        matches: u64,
    },

    /// A single way matched but the access was denied.
    #[error("permission fault: {0}")]
    Permission(#[from] PermissionFault),
}

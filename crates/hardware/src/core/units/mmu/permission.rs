//! Permission Validator.
//!
//! Checks a matched translation against the requested access. The check is
//! purely combinational and evaluated in a fixed order; the first failing
//! step decides the fault:
//!
//! 1. The entry must be valid.
//! 2. The ASIDs must be equal unless the entry is global.
//! 3. The requested XWR triple must equal the stored triple exactly.
//! 4. Supervisor mode may use supervisor pages always, and user pages only
//!    with supervisor access (SUM) set.
//! 5. User mode may only use user pages.
//!
//! Step 3 is an equality test, not a subset test: an `RWX` page does not
//! satisfy a plain read request.

use super::pte::{EntryLayout, TranslationEntry};
use crate::common::data::AccessRequest;
use crate::common::error::PermissionFault;

/// Stateless permission checker for one stored-word layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PermissionValidator {
    layout: EntryLayout,
}

impl PermissionValidator {
    /// Creates a validator; requested ASIDs are truncated to the layout's width.
    pub const fn new(layout: EntryLayout) -> Self {
        Self { layout }
    }

    /// Runs the decision sequence.
    ///
    /// # Arguments
    ///
    /// * `entry` - The matched translation.
    /// * `request` - The access being translated.
    ///
    /// # Returns
    ///
    /// `Ok(())` when the access is allowed, otherwise the first failing check.
    pub const fn check(
        &self,
        entry: &TranslationEntry,
        request: &AccessRequest,
    ) -> Result<(), PermissionFault> {
        let pte = entry.pte;
        if !pte.valid() {
            return Err(PermissionFault::NotValid);
        }

        let requested_asid = self.layout.truncate_asid(request.asid);
        if entry.asid != requested_asid && !pte.global() {
            return Err(PermissionFault::AsidMismatch {
                entry: entry.asid,
                requested: requested_asid,
            });
        }

        if pte.xwr().bits() != request.xwr.bits() {
            return Err(PermissionFault::XwrMismatch {
                entry: pte.xwr().bits(),
                requested: request.xwr.bits(),
            });
        }

        if request.supervisor {
            if pte.user() && !request.supervisor_access {
                return Err(PermissionFault::SupervisorDenied);
            }
        } else if !pte.user() {
            return Err(PermissionFault::UserDenied);
        }

        Ok(())
    }

    /// The `valid` output bit: high when [`check`](Self::check) passes.
    pub const fn evaluate(&self, entry: &TranslationEntry, request: &AccessRequest) -> bool {
        self.check(entry, request).is_ok()
    }
}

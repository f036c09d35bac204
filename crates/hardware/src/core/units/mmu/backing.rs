//! Secondary Translation Table.
//!
//! A larger, direct-mapped table behind the set-associative L1. Each index
//! holds one translation, found by index rather than by content:
//!
//! 1. **Index/Tag:** The low `log2(entries)` VMA bits select the slot; the next
//!    `vma_bits - index_bits` bits are compared against the stored tag.
//! 2. **Active Bit:** A slot only matches after it has been written, so a
//!    flushed table never hits on tag zero.
//! 3. **Registered Read:** Storage is two [`RegisterFile`]s (tags and
//!    translation words), so a lookup is visible one tick after the search,
//!    in step with the L1.

use super::permission::PermissionValidator;
use super::pte::{EntryLayout, TranslationEntry};
use crate::common::addr::{VirtAddr, VmaSplit};
use crate::common::bits::clog2;
use crate::common::constants::MAX_KEY_BITS;
use crate::common::data::AccessRequest;
use crate::common::error::{ConfigError, PermissionFault};
use crate::common::reg::{RegisterFile, RegisterFileInput};
use crate::config::BackingConfig;
use crate::core::traits::Clocked;

/// Command driven into the backing table for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackingCommand {
    /// Read port disabled.
    #[default]
    Idle,
    /// Look up a VMA.
    Search {
        /// Address to translate.
        vma: VirtAddr,
        /// Access descriptor handed to the permission validator.
        request: AccessRequest,
    },
    /// Overwrite the slot selected by a VMA.
    Write {
        /// Address whose index and tag receive the entry.
        vma: VirtAddr,
        /// Translation to store.
        entry: TranslationEntry,
    },
}

/// Registered result of a backing-table search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BackingLookup {
    /// A search was registered on the last edge.
    pub searched: bool,
    /// The indexed slot is active and its tag matches.
    pub hit: bool,
    /// Slot that was read.
    pub index: usize,
    /// Stored translation on a hit.
    pub entry: Option<TranslationEntry>,
    /// Permission verdict, only meaningful when `hit` is set.
    pub permission_valid: bool,
    /// First failing permission check on a denied hit.
    pub permission_fault: Option<PermissionFault>,
}

#[derive(Clone, Copy, Debug)]
struct PendingSearch {
    split: VmaSplit,
    request: AccessRequest,
}

/// Direct-mapped translation table.
#[derive(Clone, Debug)]
pub struct BackingTable {
    tags: RegisterFile,
    words: RegisterFile,
    index_bits: u32,
    tag_bits: u32,
    layout: EntryLayout,
    validator: PermissionValidator,
    pending: Option<PendingSearch>,
}

impl BackingTable {
    /// Creates an empty table.
    ///
    /// # Arguments
    ///
    /// * `config` - Entry count (a power of two).
    /// * `vma_bits` - Width of the VMA bus.
    /// * `layout` - Stored word layout, shared with the L1.
    pub fn new(config: &BackingConfig, vma_bits: u32, layout: EntryLayout) -> Result<Self, ConfigError> {
        if config.entries == 0 {
            return Err(ConfigError::Zero {
                what: "l2 entries",
            });
        }
        if !config.entries.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                what: "l2 entries",
                value: config.entries,
            });
        }
        if vma_bits > MAX_KEY_BITS {
            return Err(ConfigError::TooLarge {
                what: "vma_bits",
                value: vma_bits as usize,
                max: MAX_KEY_BITS as usize,
            });
        }
        let index_bits = clog2(config.entries);
        if vma_bits <= index_bits {
            return Err(ConfigError::TooSmall {
                what: "vma_bits",
                value: vma_bits as usize,
                min: index_bits as usize + 1,
            });
        }
        let tag_bits = vma_bits - index_bits;

        Ok(Self {
            tags: RegisterFile::new(tag_bits + 1, config.entries)?,
            words: RegisterFile::new(layout.word_bits(), config.entries)?,
            index_bits,
            tag_bits,
            layout,
            validator: PermissionValidator::new(layout),
            pending: None,
        })
    }

    /// Number of slots.
    pub fn entries(&self) -> usize {
        self.words.size()
    }

    /// Splits a VMA into `{tag, index}`; the index is reported in `set`.
    pub const fn split(&self, vma: VirtAddr) -> VmaSplit {
        vma.split(self.index_bits, self.tag_bits)
    }

    /// Stored translation at `index`, if the slot is active.
    pub fn peek(&self, index: usize) -> Option<TranslationEntry> {
        let tag_word = self.tags.peek(index)?;
        if tag_word & 1 == 0 {
            return None;
        }
        self.words.peek(index).map(|w| self.layout.unpack(w))
    }

    /// The registered lookup.
    pub fn lookup(&self) -> BackingLookup {
        self.output()
    }

    /// Clears every slot.
    pub fn flush(&mut self) {
        self.reset();
    }

    /// Writes `entry` for `vma` on one edge.
    ///
    /// # Returns
    ///
    /// `true` if an active slot was overwritten.
    pub fn write(&mut self, vma: VirtAddr, entry: TranslationEntry) -> bool {
        let split = self.split(vma);
        let evicted = self.peek(split.set).is_some();
        self.tick(&BackingCommand::Write { vma, entry });
        evicted
    }
}

impl Clocked for BackingTable {
    type Input = BackingCommand;
    type Output = BackingLookup;

    fn tick(&mut self, command: &BackingCommand) {
        self.pending = None;
        match *command {
            BackingCommand::Idle => {
                self.tags.tick(&RegisterFileInput::idle());
                self.words.tick(&RegisterFileInput::idle());
            }
            BackingCommand::Search { vma, request } => {
                let split = self.split(vma);
                self.tags.tick(&RegisterFileInput::read(split.set));
                self.words.tick(&RegisterFileInput::read(split.set));
                self.pending = Some(PendingSearch { split, request });
            }
            BackingCommand::Write { vma, entry } => {
                let split = self.split(vma);
                let tag_word = (u128::from(split.tag) << 1) | 1;
                self.tags.tick(&RegisterFileInput::write(split.set, tag_word));
                self.words
                    .tick(&RegisterFileInput::write(split.set, self.layout.pack(entry)));
                tracing::debug!(
                    vma = format_args!("{:#x}", vma.val()),
                    index = split.set,
                    "TLB backing write"
                );
            }
        }
    }

    fn output(&self) -> BackingLookup {
        let Some(pending) = self.pending else {
            return BackingLookup::default();
        };
        let mut lookup = BackingLookup {
            searched: true,
            index: pending.split.set,
            ..BackingLookup::default()
        };
        if !self.tags.valid() {
            return lookup;
        }
        let tag_word = self.tags.data_out();
        if tag_word & 1 == 1 && (tag_word >> 1) == u128::from(pending.split.tag) {
            let entry = self.layout.unpack(self.words.data_out());
            let verdict = self.validator.check(&entry, &pending.request);
            lookup.hit = true;
            lookup.entry = Some(entry);
            lookup.permission_valid = verdict.is_ok();
            lookup.permission_fault = verdict.err();
        }
        lookup
    }

    fn reset(&mut self) {
        self.tags.reset();
        self.words.reset();
        self.pending = None;
    }
}

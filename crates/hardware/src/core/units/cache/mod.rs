//! Set-Associative Translation Cache.
//!
//! This module implements the cache walker at the heart of the TLB. It
//! composes `sets × ways` CAM entries, drives lookups and writes, and on a hit
//! routes the matched word through the permission validator.
//!
//! # Lookup
//!
//! The VMA is split into `{tag, set}`: the low `ceil(log2(sets))` bits pick the
//! set, the next `vma_bits - set_bits` bits form the tag. The tag is broadcast
//! as a read key to every way of the selected set; the registered match
//! vector is reduced by the [`AddressEncoder`]:
//!
//! - no match: miss;
//! - one match: hit, the way's translation is validated and the way becomes
//!   most recently used;
//! - several matches: aliasing. The lookup reports `hit = 0` and raises
//!   `multiple_match` so the fault can be told apart from a miss.
//!
//! # Write
//!
//! A write goes to the caller's explicit way. Without one, a way of the set
//! already holding the tag is overwritten in place, so a refill never
//! creates a duplicate; only a true miss takes the replacement policy's
//! victim. The written way becomes most recently used on the same edge.

/// Way replacement policies (PLRU, LFSR).
pub mod policies;

use self::policies::{LfsrPolicy, PlruPolicy, ReplacementPolicy};
use crate::common::addr::{VirtAddr, VmaSplit};
use crate::common::bits::clog2;
use crate::common::constants::MAX_KEY_BITS;
use crate::common::data::AccessRequest;
use crate::common::error::{ConfigError, PermissionFault};
use crate::config::{CacheConfig, ReplacementPolicy as PolicyType};
use crate::core::traits::Clocked;
use crate::core::units::cam::{AddressEncoder, CamEntry, CamEntryInput, CamEntryRegs};
use crate::core::units::mmu::permission::PermissionValidator;
use crate::core::units::mmu::pte::{EntryLayout, TranslationEntry};

/// Command driven into the cache for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CacheCommand {
    /// No operation; every match register clears.
    #[default]
    Idle,
    /// Search for a VMA on behalf of `request`.
    Search {
        /// Address to translate.
        vma: VirtAddr,
        /// Access descriptor handed to the permission validator.
        request: AccessRequest,
    },
    /// Install a translation for a VMA.
    Write {
        /// Address whose set and tag receive the entry.
        vma: VirtAddr,
        /// Explicit way, or `None` to let the replacement policy choose.
        way: Option<usize>,
        /// Translation to store.
        entry: TranslationEntry,
    },
}

/// Result of a search, presented one clock after the request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLookup {
    /// A search was registered on the last edge.
    pub searched: bool,
    /// Exactly one way matched.
    pub hit: bool,
    /// Two or more ways matched (aliasing).
    pub multiple_match: bool,
    /// Set that was searched.
    pub set: usize,
    /// Matched way (lowest on aliasing, zero on a miss).
    pub way: usize,
    /// Raw match vector of the searched set.
    pub matches: u64,
    /// Matched translation, only on a single hit.
    pub entry: Option<TranslationEntry>,
    /// Permission verdict, only meaningful when `hit` is set.
    pub permission_valid: bool,
    /// First failing permission check, when `hit` is set and access is denied.
    pub permission_fault: Option<PermissionFault>,
}

/// Bookkeeping for the last write, for the controller's statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Set that was written.
    pub set: usize,
    /// Way that was written.
    pub way: usize,
    /// The way held a translation for a different tag before the write.
    pub evicted: bool,
}

/// Search context latched alongside the CAM compare.
#[derive(Clone, Copy, Debug)]
struct SearchContext {
    set: usize,
    request: AccessRequest,
}

/// An N-way set-associative cache of translations.
#[derive(Debug)]
pub struct SetAssociativeCache {
    entries: Vec<CamEntry>,
    sets: usize,
    ways: usize,
    set_bits: u32,
    tag_bits: u32,
    layout: EntryLayout,
    validator: PermissionValidator,
    encoder: AddressEncoder,
    policy: Box<dyn ReplacementPolicy>,
    active: Option<SearchContext>,
    last_write: Option<WriteOutcome>,
}

impl SetAssociativeCache {
    /// Creates a cache using the replacement policy named by `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Entry count, associativity and policy.
    /// * `vma_bits` - Width of the VMA bus.
    /// * `layout` - Stored word layout.
    pub fn new(config: &CacheConfig, vma_bits: u32, layout: EntryLayout) -> Result<Self, ConfigError> {
        let sets = config.sets()?;
        let ways = config.ways;
        let policy: Box<dyn ReplacementPolicy> = match config.policy {
            PolicyType::Plru => Box::new(PlruPolicy::new(sets, ways)?),
            PolicyType::Lfsr => Box::new(LfsrPolicy::new(ways)?),
        };
        Self::with_policy(config, vma_bits, layout, policy)
    }

    /// Creates a cache with a caller-supplied replacement policy.
    ///
    /// The policy must accept set indices below `entries / ways` and way
    /// indices below `ways`.
    pub fn with_policy(
        config: &CacheConfig,
        vma_bits: u32,
        layout: EntryLayout,
        policy: Box<dyn ReplacementPolicy>,
    ) -> Result<Self, ConfigError> {
        let sets = config.sets()?;
        let ways = config.ways;
        if vma_bits > MAX_KEY_BITS {
            return Err(ConfigError::TooLarge {
                what: "vma_bits",
                value: vma_bits as usize,
                max: MAX_KEY_BITS as usize,
            });
        }
        let set_bits = clog2(sets);
        if vma_bits <= set_bits {
            return Err(ConfigError::TooSmall {
                what: "vma_bits",
                value: vma_bits as usize,
                min: set_bits as usize + 1,
            });
        }
        let tag_bits = vma_bits - set_bits;
        let entries = (0..sets * ways)
            .map(|_| CamEntry::new(tag_bits, layout.word_bits()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            entries,
            sets,
            ways,
            set_bits,
            tag_bits,
            layout,
            validator: PermissionValidator::new(layout),
            encoder: AddressEncoder::new(ways)?,
            policy,
            active: None,
            last_write: None,
        })
    }

    /// Number of sets.
    pub const fn sets(&self) -> usize {
        self.sets
    }

    /// Ways per set.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Width of the set index.
    pub const fn set_bits(&self) -> u32 {
        self.set_bits
    }

    /// Width of the stored tag.
    pub const fn tag_bits(&self) -> u32 {
        self.tag_bits
    }

    /// Stored word layout.
    pub const fn layout(&self) -> EntryLayout {
        self.layout
    }

    /// Splits a VMA into this cache's `{tag, set}` coordinates.
    pub const fn split(&self, vma: VirtAddr) -> VmaSplit {
        vma.split(self.set_bits, self.tag_bits)
    }

    /// The way the replacement policy would evict from `set` right now.
    pub fn victim(&self, set: usize) -> usize {
        self.policy.get_victim(set)
    }

    /// Read-only view of the entry at `{set, way}`.
    pub fn entry(&self, set: usize, way: usize) -> Option<&CamEntry> {
        if set >= self.sets || way >= self.ways {
            return None;
        }
        self.entries.get(set * self.ways + way)
    }

    /// The lookup registered on the last edge.
    ///
    /// Returns a default (all-clear) lookup when the last command was not a
    /// search.
    pub fn lookup(&self) -> CacheLookup {
        self.output()
    }

    /// Outcome of the write committed on the last edge, if any.
    pub const fn last_write(&self) -> Option<WriteOutcome> {
        self.last_write
    }

    /// Drives a search and samples the result one clock later.
    ///
    /// # Arguments
    ///
    /// * `vma` - Address to translate.
    /// * `request` - Access descriptor, held for the cycle.
    ///
    /// # Returns
    ///
    /// The lookup visible after the edge.
    pub fn search(&mut self, vma: VirtAddr, request: AccessRequest) -> CacheLookup {
        self.step(&CacheCommand::Search { vma, request })
    }

    /// Drives a write for one cycle.
    ///
    /// # Arguments
    ///
    /// * `vma` - Address whose set and tag receive the entry.
    /// * `way` - Explicit way, or `None` to rewrite the way already holding
    ///   the tag, falling back to the policy's victim.
    /// * `entry` - Translation to store.
    ///
    /// # Returns
    ///
    /// The set and way that were written.
    pub fn write(&mut self, vma: VirtAddr, way: Option<usize>, entry: TranslationEntry) -> WriteOutcome {
        self.tick(&CacheCommand::Write { vma, way, entry });
        // A write edge always records its outcome.
        self.last_write.unwrap_or(WriteOutcome {
            set: 0,
            way: 0,
            evicted: false,
        })
    }

    /// Clears every entry and the replacement state.
    pub fn flush(&mut self) {
        self.reset();
    }

    /// Clocks every entry with the per-entry command chosen by `select`.
    fn clock_entries(&mut self, select: impl Fn(usize) -> CamEntryInput) {
        let next: Vec<CamEntryRegs> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| e.next_state(&select(i)))
            .collect();
        for (entry, regs) in self.entries.iter_mut().zip(next) {
            entry.commit(regs);
        }
    }

    /// Way of `set` already holding `tag`, lowest first.
    fn stored_way(&self, set: usize, tag: u64) -> Option<usize> {
        let base = set * self.ways;
        self.entries[base..base + self.ways]
            .iter()
            .position(|e| e.occupied() && e.key() == tag)
    }

    /// Registered match vector of one set.
    fn match_vector(&self, set: usize) -> u64 {
        let base = set * self.ways;
        self.entries[base..base + self.ways]
            .iter()
            .enumerate()
            .filter(|(_, e)| e.matched())
            .fold(0u64, |acc, (way, _)| acc | (1 << way))
    }
}

impl Clocked for SetAssociativeCache {
    type Input = CacheCommand;
    type Output = CacheLookup;

    fn tick(&mut self, command: &CacheCommand) {
        self.policy.tick();
        self.last_write = None;
        self.active = None;

        match *command {
            CacheCommand::Idle => self.clock_entries(|_| CamEntryInput::idle()),
            CacheCommand::Search { vma, request } => {
                let split = self.split(vma);
                let base = split.set * self.ways;
                let ways = self.ways;
                self.clock_entries(|i| {
                    if (base..base + ways).contains(&i) {
                        CamEntryInput::read(split.tag)
                    } else {
                        CamEntryInput::idle()
                    }
                });
                self.active = Some(SearchContext {
                    set: split.set,
                    request,
                });

                let lookup = self.output();
                tracing::trace!(
                    vma = format_args!("{:#x}", vma.val()),
                    set = split.set,
                    tag = format_args!("{:#x}", split.tag),
                    matches = format_args!("{:#b}", lookup.matches),
                    "TLB cache search"
                );
                if lookup.hit {
                    self.policy.update(lookup.set, lookup.way);
                } else if lookup.multiple_match {
                    tracing::warn!(
                        set = lookup.set,
                        matches = format_args!("{:#b}", lookup.matches),
                        "aliasing: several ways hold the same tag"
                    );
                }
            }
            CacheCommand::Write { vma, way, entry } => {
                let split = self.split(vma);
                let way = match way {
                    Some(w) if w < self.ways => w,
                    Some(w) => {
                        tracing::warn!(way = w, ways = self.ways, "explicit way out of range, truncated");
                        w & (self.ways - 1)
                    }
                    None => self
                        .stored_way(split.set, split.tag)
                        .unwrap_or_else(|| self.policy.get_victim(split.set)),
                };
                let target = split.set * self.ways + way;
                let slot = &self.entries[target];
                let evicted = slot.occupied() && slot.key() != split.tag;
                let word = self.layout.pack(entry);
                self.clock_entries(|i| {
                    if i == target {
                        CamEntryInput::write(split.tag, word)
                    } else {
                        CamEntryInput::idle()
                    }
                });
                self.policy.update(split.set, way);
                self.last_write = Some(WriteOutcome {
                    set: split.set,
                    way,
                    evicted,
                });
                tracing::debug!(
                    vma = format_args!("{:#x}", vma.val()),
                    set = split.set,
                    way,
                    evicted,
                    "TLB cache write"
                );
            }
        }
    }

    fn output(&self) -> CacheLookup {
        let Some(ctx) = self.active else {
            return CacheLookup::default();
        };
        let matches = self.match_vector(ctx.set);
        let encoded = self.encoder.evaluate(matches);
        let mut lookup = CacheLookup {
            searched: true,
            hit: encoded.single_match,
            multiple_match: encoded.multiple_match,
            set: ctx.set,
            way: encoded.index,
            matches,
            ..CacheLookup::default()
        };
        if encoded.single_match {
            let word = self.entries[ctx.set * self.ways + encoded.index].data();
            let entry = self.layout.unpack(word);
            let verdict = self.validator.check(&entry, &ctx.request);
            lookup.entry = Some(entry);
            lookup.permission_valid = verdict.is_ok();
            lookup.permission_fault = verdict.err();
        }
        lookup
    }

    fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.tick(&CamEntryInput::clear());
        }
        self.policy.reset();
        self.active = None;
        self.last_write = None;
    }
}

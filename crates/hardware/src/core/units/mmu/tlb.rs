//! Translation Lookaside Buffer (TLB) controller.
//!
//! Ties the set-associative L1, the optional direct-mapped secondary table
//! and the permission validator together behind a 2-bit command interface:
//!
//! | Bits | Command    | Effect                                              |
//! |------|------------|-----------------------------------------------------|
//! | `00` | `None`     | Tables idle, response cleared.                      |
//! | `01` | `Search`   | Both tables searched; result visible after the edge.|
//! | `10` | `WriteL1`  | Translation installed in the L1 (explicit or victim way). |
//! |      |            | A resident tag is overwritten in place.             |
//! | `11` | `WriteL2`  | Translation installed in the secondary table.       |
//!
//! A `mode` of zero (bare) disables translation: the command is ignored and
//! the response is the bypass response (`bypassed = 1`, everything else
//! zero). The consumer maps addresses one-to-one while bypassed.
//!
//! On a search, an L1 single hit wins; an L1 aliasing fault is reported as
//! such even if the secondary table holds the tag; otherwise a secondary hit
//! is reported. A permission fault keeps `hit = 1` with `valid = 0` and
//! drives `pte_out = 0`.

use std::fmt;

use super::backing::{BackingCommand, BackingLookup, BackingTable};
use super::pte::{EntryLayout, PageTableEntry, TranslationEntry};
use crate::common::addr::VirtAddr;
use crate::common::bits::field;
use crate::common::constants::{COMMAND_BITS, MODE_BARE, MODE_BITS, MODE_SV39};
use crate::common::data::{AccessRequest, AccessType, Xwr};
use crate::common::error::{ConfigError, PermissionFault, TlbFault};
use crate::config::TlbConfig;
use crate::core::traits::Clocked;
use crate::core::units::cache::{CacheCommand, CacheLookup, SetAssociativeCache};
use crate::stats::TlbStats;

/// The 2-bit TLB command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TlbCommand {
    /// `00`: no operation.
    #[default]
    None,
    /// `01`: translate a VMA.
    Search,
    /// `10`: install a translation in the L1.
    WriteL1,
    /// `11`: install a translation in the secondary table.
    WriteL2,
}

impl TlbCommand {
    /// Decodes the low two bits of `bits`.
    pub const fn from_bits(bits: u8) -> Self {
        match field(bits as u64, 0, COMMAND_BITS) {
            0b00 => Self::None,
            0b01 => Self::Search,
            0b10 => Self::WriteL1,
            _ => Self::WriteL2,
        }
    }

    /// Encodes the command as its 2-bit pattern.
    pub const fn bits(self) -> u8 {
        match self {
            Self::None => 0b00,
            Self::Search => 0b01,
            Self::WriteL1 => 0b10,
            Self::WriteL2 => 0b11,
        }
    }
}

/// Inputs sampled by the TLB on one clock edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TlbRequest {
    /// Operation to perform.
    pub command: TlbCommand,
    /// Virtual memory address; truncated to the configured width.
    pub vma: VirtAddr,
    /// Requesting (search) or owning (write) address space.
    pub asid: u32,
    /// Requested access triple (search only).
    pub xwr: Xwr,
    /// Requester runs in supervisor mode.
    pub supervisor: bool,
    /// Supervisor may use user pages (SUM).
    pub supervisor_access: bool,
    /// Translation mode; zero disables the TLB.
    pub mode: u8,
    /// Entry to install (writes only).
    pub pte_in: PageTableEntry,
    /// Explicit L1 way for `WriteL1`; `None` selects the policy victim.
    pub way: Option<usize>,
}

impl Default for TlbRequest {
    fn default() -> Self {
        Self::idle()
    }
}

impl TlbRequest {
    /// A `None` command with translation enabled.
    pub const fn idle() -> Self {
        Self {
            command: TlbCommand::None,
            vma: VirtAddr(0),
            asid: 0,
            xwr: Xwr::NONE,
            supervisor: false,
            supervisor_access: false,
            mode: MODE_SV39,
            pte_in: PageTableEntry(0),
            way: None,
        }
    }

    /// A user-mode search for `vma` under `asid`.
    pub const fn search(vma: u64, asid: u32, xwr: Xwr) -> Self {
        Self {
            command: TlbCommand::Search,
            vma: VirtAddr(vma),
            asid,
            xwr,
            ..Self::idle()
        }
    }

    /// A user-mode search whose XWR triple is derived from an access type.
    pub fn access(vma: u64, asid: u32, access: AccessType) -> Self {
        Self::search(vma, asid, Xwr::from(access))
    }

    /// Installs `pte` for `vma` under `asid` in the L1, in the way already
    /// holding the tag, else the victim way.
    pub const fn write_l1(vma: u64, asid: u32, pte: PageTableEntry) -> Self {
        Self {
            command: TlbCommand::WriteL1,
            vma: VirtAddr(vma),
            asid,
            pte_in: pte,
            ..Self::idle()
        }
    }

    /// Installs `pte` for `vma` under `asid` in the secondary table.
    pub const fn write_l2(vma: u64, asid: u32, pte: PageTableEntry) -> Self {
        Self {
            command: TlbCommand::WriteL2,
            vma: VirtAddr(vma),
            asid,
            pte_in: pte,
            ..Self::idle()
        }
    }

    /// Runs the request in supervisor mode, with or without SUM.
    pub const fn in_supervisor(mut self, supervisor_access: bool) -> Self {
        self.supervisor = true;
        self.supervisor_access = supervisor_access;
        self
    }

    /// Overrides the translation mode.
    pub const fn with_mode(mut self, mode: u8) -> Self {
        self.mode = mode;
        self
    }

    /// Targets an explicit L1 way.
    pub const fn with_way(mut self, way: usize) -> Self {
        self.way = Some(way);
        self
    }

    const fn access_request(&self, asid: u32) -> AccessRequest {
        AccessRequest {
            xwr: self.xwr,
            supervisor: self.supervisor,
            supervisor_access: self.supervisor_access,
            asid,
        }
    }
}

/// Registered TLB outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TlbResponse {
    /// Exactly one translation matched (in either table).
    pub hit: bool,
    /// The matched translation permits the access.
    pub valid: bool,
    /// Several L1 ways matched.
    pub multiple_match: bool,
    /// Matched PTE, zero unless `hit && valid`.
    pub pte_out: PageTableEntry,
    /// Translation was disabled by `mode`.
    pub bypassed: bool,
    fault: Option<TlbFault>,
}

impl TlbResponse {
    /// The response driven while `mode` disables translation.
    pub const fn bypass() -> Self {
        Self {
            hit: false,
            valid: false,
            multiple_match: false,
            pte_out: PageTableEntry(0),
            bypassed: true,
            fault: None,
        }
    }

    /// Classifies a search that produced no usable PTE.
    ///
    /// `None` for a permitted hit, a non-search cycle, or a bypassed cycle.
    pub const fn fault(&self) -> Option<TlbFault> {
        self.fault
    }

    fn from_l1(lookup: &CacheLookup) -> Self {
        if lookup.multiple_match {
            return Self {
                multiple_match: true,
                fault: Some(TlbFault::Aliasing {
                    set: lookup.set,
                    matches: lookup.matches,
                }),
                ..Self::default()
            };
        }
        Self::from_hit(lookup.entry, lookup.permission_fault)
    }

    fn from_l2(lookup: &BackingLookup) -> Self {
        Self::from_hit(lookup.entry, lookup.permission_fault)
    }

    fn from_hit(entry: Option<TranslationEntry>, fault: Option<PermissionFault>) -> Self {
        match (entry, fault) {
            (None, _) => Self {
                fault: Some(TlbFault::Miss),
                ..Self::default()
            },
            (Some(_), Some(f)) => Self {
                hit: true,
                fault: Some(TlbFault::Permission(f)),
                ..Self::default()
            },
            (Some(e), None) => Self {
                hit: true,
                valid: true,
                pte_out: e.pte,
                ..Self::default()
            },
        }
    }
}

impl fmt::Display for TlbResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bypassed {
            return write!(f, "bypassed");
        }
        match self.fault {
            Some(fault) => write!(f, "{fault}"),
            None if self.hit => write!(f, "hit pte={}", self.pte_out),
            None => write!(f, "idle"),
        }
    }
}

/// The TLB controller.
#[derive(Debug)]
pub struct Tlb {
    vma_bits: u32,
    layout: EntryLayout,
    l1: SetAssociativeCache,
    l2: Option<BackingTable>,
    response: TlbResponse,
    stats: TlbStats,
}

impl Tlb {
    /// Builds a TLB from a configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Widths and table geometry; validated here.
    ///
    /// # Returns
    ///
    /// The TLB with every table empty, or the first `ConfigError`.
    pub fn new(config: &TlbConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let layout = EntryLayout::new(config.asid_bits, config.pte_bits)?;
        let l1 = SetAssociativeCache::new(&config.l1, config.vma_bits, layout)?;
        let l2 = config
            .l2
            .as_ref()
            .map(|l2| BackingTable::new(l2, config.vma_bits, layout))
            .transpose()?;

        tracing::debug!(
            sets = l1.sets(),
            ways = l1.ways(),
            l2_entries = l2.as_ref().map_or(0, BackingTable::entries),
            asid_bits = config.asid_bits,
            vma_bits = config.vma_bits,
            "TLB created"
        );

        Ok(Self {
            vma_bits: config.vma_bits,
            layout,
            l1,
            l2,
            response: TlbResponse::default(),
            stats: TlbStats::default(),
        })
    }

    /// The response registered on the last edge.
    pub const fn response(&self) -> TlbResponse {
        self.response
    }

    /// Counters collected since construction or the last reset.
    pub const fn stats(&self) -> &TlbStats {
        &self.stats
    }

    /// The set-associative L1.
    pub const fn l1(&self) -> &SetAssociativeCache {
        &self.l1
    }

    /// The secondary table, if configured.
    pub const fn l2(&self) -> Option<&BackingTable> {
        self.l2.as_ref()
    }

    /// Invalidates every translation in both tables and the L1 replacement state.
    ///
    /// Statistics are kept; the flush itself is counted.
    pub fn flush(&mut self) {
        self.l1.flush();
        if let Some(l2) = &mut self.l2 {
            l2.flush();
        }
        self.response = TlbResponse::default();
        self.stats.flushes += 1;
        tracing::debug!("TLB flushed");
    }

    fn tick_l2(&mut self, command: BackingCommand) {
        if let Some(l2) = &mut self.l2 {
            l2.tick(&command);
        }
    }

    fn search(&mut self, vma: VirtAddr, request: AccessRequest) -> TlbResponse {
        self.l1.tick(&CacheCommand::Search { vma, request });
        self.tick_l2(BackingCommand::Search { vma, request });
        self.stats.searches += 1;

        let l1 = self.l1.lookup();
        let l2 = self.l2.as_ref().map(BackingTable::lookup).unwrap_or_default();

        let response = if l1.hit || l1.multiple_match {
            if l1.hit {
                self.stats.l1_hits += 1;
            } else {
                self.stats.aliasing_faults += 1;
            }
            TlbResponse::from_l1(&l1)
        } else if l2.hit {
            self.stats.l2_hits += 1;
            TlbResponse::from_l2(&l2)
        } else {
            self.stats.misses += 1;
            TlbResponse::from_l1(&l1)
        };
        if matches!(response.fault, Some(TlbFault::Permission(_))) {
            self.stats.permission_faults += 1;
        }

        tracing::trace!(
            vma = format_args!("{:#x}", vma.val()),
            asid = request.asid,
            %response,
            "TLB search"
        );
        response
    }
}

impl Clocked for Tlb {
    type Input = TlbRequest;
    type Output = TlbResponse;

    fn tick(&mut self, request: &TlbRequest) {
        let mode = field(request.mode as u64, 0, MODE_BITS) as u8;
        if mode == MODE_BARE {
            self.response = TlbResponse::bypass();
            self.stats.bypassed += 1;
            tracing::debug!(command = ?request.command, "TLB bypassed");
            return;
        }

        self.stats.ticks += 1;
        let vma = request.vma.truncate(self.vma_bits);
        let asid = self.layout.truncate_asid(request.asid);
        let entry = TranslationEntry {
            pte: self.layout.truncate_pte(request.pte_in),
            asid,
        };

        self.response = match request.command {
            TlbCommand::None => {
                self.l1.tick(&CacheCommand::Idle);
                self.tick_l2(BackingCommand::Idle);
                TlbResponse::default()
            }
            TlbCommand::Search => self.search(vma, request.access_request(asid)),
            TlbCommand::WriteL1 => {
                let outcome = self.l1.write(vma, request.way, entry);
                self.tick_l2(BackingCommand::Idle);
                self.stats.l1_writes += 1;
                if outcome.evicted {
                    self.stats.evictions += 1;
                }
                TlbResponse::default()
            }
            TlbCommand::WriteL2 => {
                self.l1.tick(&CacheCommand::Idle);
                match &mut self.l2 {
                    Some(l2) => {
                        if l2.write(vma, entry) {
                            self.stats.evictions += 1;
                        }
                        self.stats.l2_writes += 1;
                    }
                    None => tracing::warn!(
                        vma = format_args!("{:#x}", vma.val()),
                        "WRITE_L2 ignored: no secondary table configured"
                    ),
                }
                TlbResponse::default()
            }
        };
    }

    fn output(&self) -> TlbResponse {
        self.response
    }

    fn reset(&mut self) {
        self.l1.reset();
        if let Some(l2) = &mut self.l2 {
            l2.reset();
        }
        self.response = TlbResponse::default();
        self.stats = TlbStats::default();
    }
}

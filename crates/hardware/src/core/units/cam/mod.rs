//! Content Addressable Memory (CAM).
//!
//! This module implements a fully associative CAM built from [`CamEntry`]
//! slots. It provides:
//! 1. **Parallel Search:** A read compares the presented key against every entry in the same cycle.
//! 2. **Addressed Writes:** A decoder selects the single entry overwritten by a write.
//! 3. **Match Encoding:** The [`AddressEncoder`] reduces the match vector to single/multiple/address.
//!
//! Reads and writes each take one clock: an entry written in cycle N can be
//! searched in cycle N+1 and its address is presented in cycle N+2. Entry
//! management (choosing which address to write) is the caller's job.

/// Match vector encoder.
pub mod encoder;

/// Single CAM slot.
pub mod entry;

pub use encoder::{AddressEncoder, EncoderOutput, one_hot_encode, priority_encode};
pub use entry::{CamCommand, CamEntry, CamEntryInput, CamEntryOutput, CamEntryRegs};

use crate::common::error::ConfigError;
use crate::core::traits::Clocked;

/// Inputs sampled by the CAM on each clock edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CamInput {
    /// Block enable; a disabled CAM idles every entry.
    pub enable: bool,
    /// High writes `key`/`data` to `address`, low searches for `key`.
    pub write_enable: bool,
    /// Entry selected for writes.
    pub address: usize,
    /// Search or write key.
    pub key: u64,
    /// Data stored on write.
    pub data: u128,
}

impl CamInput {
    /// Search every entry for `key`.
    pub const fn search(key: u64) -> Self {
        Self {
            enable: true,
            write_enable: false,
            address: 0,
            key,
            data: 0,
        }
    }

    /// Write `key`/`data` into entry `address`.
    pub const fn write(address: usize, key: u64, data: u128) -> Self {
        Self {
            enable: true,
            write_enable: true,
            address,
            key,
            data,
        }
    }

    /// CAM disabled for this cycle.
    pub const fn idle() -> Self {
        Self {
            enable: false,
            write_enable: false,
            address: 0,
            key: 0,
            data: 0,
        }
    }
}

/// Outputs of the CAM after a clock edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CamOutput {
    /// Exactly one entry matched.
    pub single_match: bool,
    /// Two or more entries matched.
    pub multiple_match: bool,
    /// Lowest matching address.
    pub match_address: usize,
    /// Data of the entry at `match_address` on a single match, zero otherwise.
    pub data_out: u128,
}

/// A fully associative content addressable memory.
#[derive(Clone, Debug)]
pub struct Cam {
    entries: Vec<CamEntry>,
    encoder: AddressEncoder,
}

impl Cam {
    /// Creates a CAM with every entry cleared.
    ///
    /// # Arguments
    ///
    /// * `key_bits` - Width of the search key.
    /// * `data_bits` - Width of the data stored alongside each key.
    /// * `cam_size` - Number of entries (1..=64).
    pub fn new(key_bits: u32, data_bits: u32, cam_size: usize) -> Result<Self, ConfigError> {
        let encoder = AddressEncoder::new(cam_size)?;
        let entries = (0..cam_size)
            .map(|_| CamEntry::new(key_bits, data_bits))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries, encoder })
    }

    /// Number of entries.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Read-only view of one entry.
    pub fn entry(&self, address: usize) -> Option<&CamEntry> {
        self.entries.get(address)
    }

    /// The registered match vector, bit `i` for entry `i`.
    pub fn match_vector(&self) -> u64 {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.matched())
            .fold(0u64, |acc, (i, _)| acc | (1 << i))
    }

    /// Decodes the command each entry receives this cycle.
    fn entry_input(&self, input: &CamInput, index: usize) -> CamEntryInput {
        let command = match (input.enable, input.write_enable) {
            (false, _) => CamCommand::None,
            (true, true) if index == input.address => CamCommand::Write,
            (true, true) => CamCommand::None,
            (true, false) => CamCommand::Read,
        };
        CamEntryInput {
            command,
            key_in: input.key,
            data_in: input.data,
        }
    }
}

impl Clocked for Cam {
    type Input = CamInput;
    type Output = CamOutput;

    fn tick(&mut self, input: &CamInput) {
        if input.enable && input.write_enable && input.address >= self.entries.len() {
            tracing::warn!(
                address = input.address,
                size = self.entries.len(),
                "CAM write address out of range; no entry selected"
            );
        }
        let next: Vec<CamEntryRegs> = (0..self.entries.len())
            .map(|i| self.entries[i].next_state(&self.entry_input(input, i)))
            .collect();
        for (entry, regs) in self.entries.iter_mut().zip(next) {
            entry.commit(regs);
        }
    }

    fn output(&self) -> CamOutput {
        let encoded = self.encoder.evaluate(self.match_vector());
        let data_out = if encoded.single_match {
            self.entries[encoded.index].data()
        } else {
            0
        };
        CamOutput {
            single_match: encoded.single_match,
            multiple_match: encoded.multiple_match,
            match_address: encoded.index,
            data_out,
        }
    }

    fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.tick(&CamEntryInput::clear());
        }
    }
}

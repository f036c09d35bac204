//! Content Addressable Memory (CAM) Entry.
//!
//! A single CAM slot holding one key and one data word. On a read command it
//! compares the presented key with the stored key and registers the result;
//! on a write command it stores the presented key and data.
//!
//! # Timing
//!
//! The comparison is registered: `matched` reflects the key presented during
//! the previous cycle, never the one currently on the bus. This keeps the
//! comparator off the combinational path at the cost of one cycle of latency.
//!
//! # Commands
//!
//! | Bits | Command | Effect on the edge                                  |
//! |------|---------|-----------------------------------------------------|
//! | `00` | None    | storage held, `matched = 0`                         |
//! | `01` | Read    | `matched = occupied && key_in == key`               |
//! | `10` | Write   | `key = key_in`, `data = data_in`, `matched = 0`     |
//! | `11` | Reset   | key, data, occupancy and `matched` cleared          |
//!
//! None is not a reset: idle ways of a set receive None every cycle and must
//! keep their contents. Only Reset clears storage.

use crate::common::bits::{mask_u64, mask_u128};
use crate::common::constants::{MAX_DATA_BITS, MAX_KEY_BITS};
use crate::common::error::ConfigError;
use crate::core::traits::Clocked;

/// The 2-bit command driven into a CAM entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CamCommand {
    /// No action (`00`).
    #[default]
    None,
    /// Compare the presented key (`01`).
    Read,
    /// Store the presented key and data (`10`).
    Write,
    /// Clear the entry (`11`).
    Reset,
}

impl CamCommand {
    /// Decodes a command from the low two bits of `bits`.
    ///
    /// Every 2-bit pattern is a legal command.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::None,
            0b01 => Self::Read,
            0b10 => Self::Write,
            _ => Self::Reset,
        }
    }

    /// Returns the 2-bit encoding.
    pub const fn bits(self) -> u8 {
        match self {
            Self::None => 0b00,
            Self::Read => 0b01,
            Self::Write => 0b10,
            Self::Reset => 0b11,
        }
    }
}

/// Inputs sampled by a CAM entry on the clock edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CamEntryInput {
    /// Operation for this cycle.
    pub command: CamCommand,
    /// Reference key (compared on read, stored on write).
    pub key_in: u64,
    /// Data stored on write.
    pub data_in: u128,
}

impl CamEntryInput {
    /// A read (compare) of `key`.
    pub const fn read(key: u64) -> Self {
        Self {
            command: CamCommand::Read,
            key_in: key,
            data_in: 0,
        }
    }

    /// A write of `key` and `data`.
    pub const fn write(key: u64, data: u128) -> Self {
        Self {
            command: CamCommand::Write,
            key_in: key,
            data_in: data,
        }
    }

    /// An idle cycle.
    pub const fn idle() -> Self {
        Self {
            command: CamCommand::None,
            key_in: 0,
            data_in: 0,
        }
    }

    /// A synchronous clear.
    pub const fn clear() -> Self {
        Self {
            command: CamCommand::Reset,
            key_in: 0,
            data_in: 0,
        }
    }
}

/// Outputs of a CAM entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CamEntryOutput {
    /// Registered comparison result.
    pub matched: bool,
    /// Stored data word.
    pub data: u128,
}

/// Register contents of a CAM entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CamEntryRegs {
    /// Stored key.
    pub key: u64,
    /// Stored data.
    pub data: u128,
    /// Set by a write, cleared by reset; only occupied entries can match.
    pub occupied: bool,
    /// Registered comparison result.
    pub matched: bool,
}

/// A single CAM slot.
#[derive(Clone, Debug)]
pub struct CamEntry {
    regs: CamEntryRegs,
    key_mask: u64,
    data_mask: u128,
}

impl CamEntry {
    /// Creates a cleared entry.
    ///
    /// # Arguments
    ///
    /// * `key_bits` - Width of the key register (1..=64).
    /// * `data_bits` - Width of the data register (1..=128).
    pub fn new(key_bits: u32, data_bits: u32) -> Result<Self, ConfigError> {
        if key_bits == 0 {
            return Err(ConfigError::Zero { what: "key width" });
        }
        if data_bits == 0 {
            return Err(ConfigError::Zero { what: "data width" });
        }
        if key_bits > MAX_KEY_BITS {
            return Err(ConfigError::TooLarge {
                what: "key width",
                value: key_bits as usize,
                max: MAX_KEY_BITS as usize,
            });
        }
        if data_bits > MAX_DATA_BITS {
            return Err(ConfigError::TooLarge {
                what: "data width",
                value: data_bits as usize,
                max: MAX_DATA_BITS as usize,
            });
        }
        Ok(Self {
            regs: CamEntryRegs::default(),
            key_mask: mask_u64(key_bits),
            data_mask: mask_u128(data_bits),
        })
    }

    /// Computes the register values after the next edge without committing them.
    ///
    /// # Arguments
    ///
    /// * `input` - Signals driven during the current cycle.
    ///
    /// # Returns
    ///
    /// The register contents the entry will hold after `tick(input)`.
    pub const fn next_state(&self, input: &CamEntryInput) -> CamEntryRegs {
        let key_in = input.key_in & self.key_mask;
        let regs = self.regs;
        match input.command {
            CamCommand::None => CamEntryRegs {
                matched: false,
                ..regs
            },
            CamCommand::Read => CamEntryRegs {
                matched: regs.occupied && key_in == regs.key,
                ..regs
            },
            CamCommand::Write => CamEntryRegs {
                key: key_in,
                data: input.data_in & self.data_mask,
                occupied: true,
                matched: false,
            },
            CamCommand::Reset => CamEntryRegs {
                key: 0,
                data: 0,
                occupied: false,
                matched: false,
            },
        }
    }

    /// Commits precomputed register values.
    ///
    /// Pairs with [`CamEntry::next_state`] when a parent block evaluates all
    /// of its entries before clocking any of them.
    pub const fn commit(&mut self, next: CamEntryRegs) {
        self.regs = next;
    }

    /// Registered comparison result.
    pub const fn matched(&self) -> bool {
        self.regs.matched
    }

    /// Stored key.
    pub const fn key(&self) -> u64 {
        self.regs.key
    }

    /// Stored data word.
    pub const fn data(&self) -> u128 {
        self.regs.data
    }

    /// Whether the entry has been written since the last reset.
    pub const fn occupied(&self) -> bool {
        self.regs.occupied
    }

    /// Full register contents.
    pub const fn regs(&self) -> CamEntryRegs {
        self.regs
    }
}

impl Clocked for CamEntry {
    type Input = CamEntryInput;
    type Output = CamEntryOutput;

    fn tick(&mut self, input: &CamEntryInput) {
        let next = self.next_state(input);
        self.commit(next);
    }

    fn output(&self) -> CamEntryOutput {
        CamEntryOutput {
            matched: self.regs.matched,
            data: self.regs.data,
        }
    }

    fn reset(&mut self) {
        self.regs = CamEntryRegs::default();
    }
}

//! Addressed Register File.
//!
//! This module provides the `RegisterFile` struct, a bank of equally sized
//! registers selected by address. It provides:
//! 1. **Registered Reads:** The addressed word appears on `data_out` one clock after the request.
//! 2. **Writes:** The addressed register is overwritten on the clock edge; the outputs are invalidated.
//! 3. **Enable Gating:** A disabled file drives `valid = 0` and `data_out = 0`.
//!
//! The TLB uses it to back entries that are found by index rather than by
//! content (the secondary translation table).

use crate::common::bits::mask_u128;
use crate::common::constants::MAX_DATA_BITS;
use crate::common::error::ConfigError;
use crate::core::traits::Clocked;

/// Inputs sampled by the register file on each clock edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegisterFileInput {
    /// Block enable.
    pub enable: bool,
    /// High selects a write, low selects a read.
    pub write_enable: bool,
    /// Register address. Wraps modulo the file size like a truncated address bus.
    pub address: usize,
    /// Word to write.
    pub data_in: u128,
}

impl RegisterFileInput {
    /// A read of `address`.
    pub const fn read(address: usize) -> Self {
        Self {
            enable: true,
            write_enable: false,
            address,
            data_in: 0,
        }
    }

    /// A write of `data` to `address`.
    pub const fn write(address: usize, data: u128) -> Self {
        Self {
            enable: true,
            write_enable: true,
            address,
            data_in: data,
        }
    }

    /// Block disabled for this cycle.
    pub const fn idle() -> Self {
        Self {
            enable: false,
            write_enable: false,
            address: 0,
            data_in: 0,
        }
    }
}

/// Registered outputs of the register file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegisterFileOutput {
    /// High when `data_out` holds the result of a read.
    pub valid: bool,
    /// The word read on the previous edge.
    pub data_out: u128,
}

/// A bank of `size` registers, each `data_bits` wide.
#[derive(Clone, Debug)]
pub struct RegisterFile {
    registers: Vec<u128>,
    data_mask: u128,
    out: RegisterFileOutput,
}

impl RegisterFile {
    /// Creates a register file with every register cleared.
    ///
    /// # Arguments
    ///
    /// * `data_bits` - Width of one register (at most 128).
    /// * `size` - Number of registers.
    ///
    /// # Returns
    ///
    /// The register file, or a `ConfigError` if either dimension is unusable.
    pub fn new(data_bits: u32, size: usize) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::Zero {
                what: "register file size",
            });
        }
        if data_bits == 0 {
            return Err(ConfigError::Zero {
                what: "register width",
            });
        }
        if data_bits > MAX_DATA_BITS {
            return Err(ConfigError::TooLarge {
                what: "register width",
                value: data_bits as usize,
                max: MAX_DATA_BITS as usize,
            });
        }
        Ok(Self {
            registers: vec![0; size],
            data_mask: mask_u128(data_bits),
            out: RegisterFileOutput::default(),
        })
    }

    /// Number of registers in the file.
    pub fn size(&self) -> usize {
        self.registers.len()
    }

    /// Reads a register directly, bypassing the clocked read port.
    ///
    /// Intended for inspection; hardware consumers go through `tick`.
    pub fn peek(&self, address: usize) -> Option<u128> {
        self.registers.get(address).copied()
    }

    /// High when the last edge performed a read.
    pub const fn valid(&self) -> bool {
        self.out.valid
    }

    /// The word read on the last edge, or zero.
    pub const fn data_out(&self) -> u128 {
        self.out.data_out
    }
}

impl Clocked for RegisterFile {
    type Input = RegisterFileInput;
    type Output = RegisterFileOutput;

    fn tick(&mut self, input: &RegisterFileInput) {
        if !input.enable {
            self.out = RegisterFileOutput::default();
            return;
        }
        let idx = input.address % self.registers.len();
        if input.write_enable {
            self.registers[idx] = input.data_in & self.data_mask;
            self.out = RegisterFileOutput::default();
        } else {
            self.out = RegisterFileOutput {
                valid: true,
                data_out: self.registers[idx],
            };
        }
    }

    fn output(&self) -> RegisterFileOutput {
        self.out
    }

    fn reset(&mut self) {
        self.registers.fill(0);
        self.out = RegisterFileOutput::default();
    }
}

//! Pseudo-Random (LFSR) Replacement Policy.
//!
//! Instead of tracking recency, this policy takes the low bits of a
//! free-running Fibonacci LFSR as the victim way. The register advances once
//! per clock whether or not a victim is requested, so the choice depends on
//! when the write arrives, not on the access history.
//!
//! The default polynomial is `x^24 + x^23 + x^22 + x^17 + 1`, a maximal-length
//! 24-bit sequence, seeded with 1.

use super::ReplacementPolicy;
use crate::common::bits::mask_u64;
use crate::common::error::ConfigError;

/// Exponents of the default 24-bit maximal-length polynomial.
pub const LFSR_POLY_24: &[u32] = &[24, 23, 22, 17];

/// A Fibonacci linear feedback shift register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lfsr {
    taps: Vec<u32>,
    width: u32,
    state: u64,
}

impl Lfsr {
    /// Creates a register for the polynomial with the given non-zero exponents.
    ///
    /// The width is the largest exponent; the register resets to 1.
    pub fn new(exponents: &[u32]) -> Result<Self, ConfigError> {
        let width = exponents.iter().copied().max().unwrap_or(0);
        if width == 0 {
            return Err(ConfigError::Zero {
                what: "LFSR polynomial degree",
            });
        }
        if width > u64::BITS {
            return Err(ConfigError::TooLarge {
                what: "LFSR polynomial degree",
                value: width as usize,
                max: u64::BITS as usize,
            });
        }
        let mut taps: Vec<u32> = exponents.iter().copied().filter(|&e| e > 0).collect();
        taps.sort_unstable();
        taps.dedup();
        Ok(Self {
            taps,
            width,
            state: 1,
        })
    }

    /// Register width in bits.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Current register contents.
    pub const fn state(&self) -> u64 {
        self.state
    }

    /// Shifts the register by one position.
    ///
    /// The feedback bit is the XOR of bit `e - 1` for every exponent `e`.
    pub fn advance(&mut self) {
        let feedback = self
            .taps
            .iter()
            .fold(0, |acc, &e| acc ^ ((self.state >> (e - 1)) & 1));
        self.state = ((self.state << 1) | feedback) & mask_u64(self.width);
    }

    /// Returns the register to its seed value.
    pub const fn clear(&mut self) {
        self.state = 1;
    }
}

/// LFSR victim selection shared by every set.
#[derive(Clone, Debug)]
pub struct LfsrPolicy {
    lfsr: Lfsr,
    ways: usize,
}

impl LfsrPolicy {
    /// Creates a new LFSR policy instance using [`LFSR_POLY_24`].
    ///
    /// # Arguments
    ///
    /// * `ways` - The associativity; must be a power of two.
    pub fn new(ways: usize) -> Result<Self, ConfigError> {
        if ways == 0 {
            return Err(ConfigError::Zero { what: "ways" });
        }
        if !ways.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                what: "ways",
                value: ways,
            });
        }
        Ok(Self {
            lfsr: Lfsr::new(LFSR_POLY_24)?,
            ways,
        })
    }

    /// The underlying shift register.
    pub const fn lfsr(&self) -> &Lfsr {
        &self.lfsr
    }
}

impl ReplacementPolicy for LfsrPolicy {
    /// Access history does not influence a random policy.
    fn update(&mut self, _set: usize, _way: usize) {}

    fn get_victim(&self, _set: usize) -> usize {
        (self.lfsr.state() as usize) & (self.ways - 1)
    }

    fn tick(&mut self) {
        self.lfsr.advance();
    }

    fn reset(&mut self) {
        self.lfsr.clear();
    }
}

//! Address Encoder.
//!
//! Reduces a match vector to an address. It combines a one-hot encoder (which
//! only produces an address when exactly one bit is set) and a priority
//! encoder (which always produces the lowest set bit) to report whether the
//! vector had no, one, or several bits hot.
//!
//! | Vector          | `single_match` | `multiple_match` | `index`          |
//! |-----------------|----------------|------------------|------------------|
//! | all zero        | 0              | 0                | 0                |
//! | one bit at `i`  | 1              | 0                | `i`              |
//! | two or more     | 0              | 1                | lowest set bit   |
//!
//! Ties always resolve to the lowest index.

use crate::common::constants::MAX_MATCH_WIDTH;
use crate::common::error::ConfigError;

/// Returns the position of the lowest set bit, or `None` for an empty vector.
#[inline(always)]
pub const fn priority_encode(vector: u64) -> Option<usize> {
    if vector == 0 {
        None
    } else {
        Some(vector.trailing_zeros() as usize)
    }
}

/// Returns the position of the set bit when exactly one bit is set.
#[inline(always)]
pub const fn one_hot_encode(vector: u64) -> Option<usize> {
    if vector.is_power_of_two() {
        Some(vector.trailing_zeros() as usize)
    } else {
        None
    }
}

/// Encoder verdict for one match vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncoderOutput {
    /// Exactly one bit was set.
    pub single_match: bool,
    /// Two or more bits were set.
    pub multiple_match: bool,
    /// Lowest set bit, or zero when nothing matched.
    pub index: usize,
}

impl EncoderOutput {
    /// Either match flag is raised.
    pub const fn any(&self) -> bool {
        self.single_match || self.multiple_match
    }
}

/// Stateless encoder over a fixed-width match vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressEncoder {
    width: usize,
}

impl AddressEncoder {
    /// Creates an encoder for vectors of `width` bits (1..=64).
    pub const fn new(width: usize) -> Result<Self, ConfigError> {
        if width == 0 {
            return Err(ConfigError::Zero {
                what: "encoder width",
            });
        }
        if width > MAX_MATCH_WIDTH {
            return Err(ConfigError::TooLarge {
                what: "encoder width",
                value: width,
                max: MAX_MATCH_WIDTH,
            });
        }
        Ok(Self { width })
    }

    /// Width of the input vector.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Encodes `vector`, ignoring bits at or above the encoder width.
    ///
    /// # Arguments
    ///
    /// * `vector` - Match vector, bit `i` set when entry `i` matched.
    ///
    /// # Returns
    ///
    /// The single/multiple/index triple described in the module table.
    pub const fn evaluate(&self, vector: u64) -> EncoderOutput {
        let vector = if self.width >= u64::BITS as usize {
            vector
        } else {
            vector & ((1u64 << self.width) - 1)
        };
        match priority_encode(vector) {
            None => EncoderOutput {
                single_match: false,
                multiple_match: false,
                index: 0,
            },
            Some(index) => {
                let single = one_hot_encode(vector).is_some();
                EncoderOutput {
                    single_match: single,
                    multiple_match: !single,
                    index,
                }
            }
        }
    }
}

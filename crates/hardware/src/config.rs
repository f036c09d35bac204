//! Configuration system for the TLB model.
//!
//! This module defines the configuration structures used to parameterize a
//! TLB instance. It provides:
//! 1. **Defaults:** Baseline widths and geometry (15-bit ASID, 36-bit VMA, 64-bit PTE, 64-entry 4-way L1).
//! 2. **Structures:** Top-level widths plus the L1 cache and the optional secondary table.
//! 3. **Enums:** Replacement policy selection.
//!
//! Configuration is supplied as JSON (`TlbConfig::from_json`, `TlbConfig::load`)
//! or built with `TlbConfig::default()`. Every field is optional in JSON.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::constants::{MAX_ASID_BITS, MAX_KEY_BITS, MAX_MATCH_WIDTH, MAX_PTE_BITS, PTE_FLAG_BITS};
use crate::common::error::ConfigError;

/// Default configuration constants for the TLB.
mod defaults {
    /// ASID width in bits.
    pub const ASID_BITS: u32 = 15;

    /// Virtual memory address width in bits.
    pub const VMA_BITS: u32 = 36;

    /// Page table entry width in bits.
    pub const PTE_BITS: u32 = 64;

    /// Total L1 entries.
    pub const L1_ENTRIES: usize = 64;

    /// L1 associativity.
    pub const L1_WAYS: usize = 4;

    /// Secondary table entries.
    pub const L2_ENTRIES: usize = 512;
}

/// Way replacement policy for the set-associative L1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Tree pseudo-LRU, one `ways - 1` bit tree per set.
    #[default]
    #[serde(alias = "Plru")]
    Plru,
    /// Free-running 24-bit LFSR shared by all sets.
    #[serde(alias = "Lfsr")]
    Lfsr,
}

/// Root configuration for one TLB.
///
/// # Examples
///
/// ```
/// use rvsim_tlb::config::{ReplacementPolicy, TlbConfig};
///
/// let json = r#"{
///     "asid_bits": 9,
///     "l1": { "entries": 32, "ways": 2, "policy": "LFSR" },
///     "l2": { "entries": 256 }
/// }"#;
///
/// let config = TlbConfig::from_json(json).unwrap();
/// assert_eq!(config.asid_bits, 9);
/// assert_eq!(config.vma_bits, 36);
/// assert_eq!(config.l1.policy, ReplacementPolicy::Lfsr);
/// assert_eq!(config.l2.map(|l2| l2.entries), Some(256));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TlbConfig {
    /// ASID width stored alongside each PTE.
    #[serde(default = "TlbConfig::default_asid_bits")]
    pub asid_bits: u32,

    /// Virtual memory address width.
    #[serde(default = "TlbConfig::default_vma_bits")]
    pub vma_bits: u32,

    /// Page table entry width.
    #[serde(default = "TlbConfig::default_pte_bits")]
    pub pte_bits: u32,

    /// Set-associative first-level table
    #[serde(default)]
    pub l1: CacheConfig,

    /// Direct-mapped secondary table, absent unless configured
    #[serde(default)]
    pub l2: Option<BackingConfig>,
}

impl TlbConfig {
    const fn default_asid_bits() -> u32 {
        defaults::ASID_BITS
    }

    const fn default_vma_bits() -> u32 {
        defaults::VMA_BITS
    }

    const fn default_pte_bits() -> u32 {
        defaults::PTE_BITS
    }

    /// Parses a configuration from JSON text and validates it.
    ///
    /// # Errors
    ///
    /// `ConfigError::Json` on malformed input, or the first geometry error.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// `ConfigError::Io` if the file cannot be read, otherwise as [`TlbConfig::from_json`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks every width and geometry parameter.
    ///
    /// # Errors
    ///
    /// The first offending parameter, in declaration order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("asid_bits", self.asid_bits as usize, 1, MAX_ASID_BITS as usize)?;
        check_range("vma_bits", self.vma_bits as usize, 1, MAX_KEY_BITS as usize)?;
        check_range(
            "pte_bits",
            self.pte_bits as usize,
            PTE_FLAG_BITS as usize,
            MAX_PTE_BITS as usize,
        )?;

        let sets = self.l1.sets()?;
        if self.vma_bits <= sets.trailing_zeros() {
            return Err(ConfigError::TooSmall {
                what: "vma_bits",
                value: self.vma_bits as usize,
                min: sets.trailing_zeros() as usize + 1,
            });
        }

        if let Some(l2) = &self.l2 {
            if l2.entries == 0 {
                return Err(ConfigError::Zero { what: "l2 entries" });
            }
            if !l2.entries.is_power_of_two() {
                return Err(ConfigError::NotPowerOfTwo {
                    what: "l2 entries",
                    value: l2.entries,
                });
            }
            if self.vma_bits <= l2.entries.trailing_zeros() {
                return Err(ConfigError::TooSmall {
                    what: "vma_bits",
                    value: self.vma_bits as usize,
                    min: l2.entries.trailing_zeros() as usize + 1,
                });
            }
        }
        Ok(())
    }
}

impl Default for TlbConfig {
    fn default() -> Self {
        Self {
            asid_bits: defaults::ASID_BITS,
            vma_bits: defaults::VMA_BITS,
            pte_bits: defaults::PTE_BITS,
            l1: CacheConfig::default(),
            l2: None,
        }
    }
}

/// Set-associative table geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Total entries (`sets × ways`)
    #[serde(default = "CacheConfig::default_entries")]
    pub entries: usize,

    /// Associativity (number of ways)
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Replacement policy
    #[serde(default)]
    pub policy: ReplacementPolicy,
}

impl CacheConfig {
    const fn default_entries() -> usize {
        defaults::L1_ENTRIES
    }

    const fn default_ways() -> usize {
        defaults::L1_WAYS
    }

    /// Number of sets implied by this geometry.
    ///
    /// # Errors
    ///
    /// Zero or non-power-of-two ways or sets, more than 64 ways, or an entry
    /// count that is not a multiple of the associativity.
    pub fn sets(&self) -> Result<usize, ConfigError> {
        if self.ways == 0 {
            return Err(ConfigError::Zero { what: "ways" });
        }
        if self.entries == 0 {
            return Err(ConfigError::Zero { what: "entries" });
        }
        if !self.ways.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                what: "ways",
                value: self.ways,
            });
        }
        if self.ways > MAX_MATCH_WIDTH {
            return Err(ConfigError::TooLarge {
                what: "ways",
                value: self.ways,
                max: MAX_MATCH_WIDTH,
            });
        }
        if self.entries % self.ways != 0 {
            return Err(ConfigError::UnevenSets {
                entries: self.entries,
                ways: self.ways,
            });
        }
        let sets = self.entries / self.ways;
        if !sets.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                what: "set count",
                value: sets,
            });
        }
        Ok(sets)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            entries: defaults::L1_ENTRIES,
            ways: defaults::L1_WAYS,
            policy: ReplacementPolicy::default(),
        }
    }
}

/// Direct-mapped secondary table geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BackingConfig {
    /// Number of slots (a power of two)
    #[serde(default = "BackingConfig::default_entries")]
    pub entries: usize,
}

impl BackingConfig {
    const fn default_entries() -> usize {
        defaults::L2_ENTRIES
    }
}

impl Default for BackingConfig {
    fn default() -> Self {
        Self {
            entries: defaults::L2_ENTRIES,
        }
    }
}

fn check_range(what: &'static str, value: usize, min: usize, max: usize) -> Result<(), ConfigError> {
    if value < min {
        return Err(ConfigError::TooSmall { what, value, min });
    }
    if value > max {
        return Err(ConfigError::TooLarge { what, value, max });
    }
    Ok(())
}

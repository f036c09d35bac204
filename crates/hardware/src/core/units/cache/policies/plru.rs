//! Pseudo-LRU (PLRU) Replacement Policy.
//!
//! PLRU approximates Least Recently Used with a binary tree of bits: N-1 bits
//! for N ways instead of a full recency stack.
//!
//! Nodes are numbered heap-style, so node `n` has children `2n+1` (the
//! "0" branch) and `2n+2` (the "1" branch):
//!
//! ```text
//! lvl0        0
//!            / \
//! lvl1      1   2
//!          / \ / \
//! lvl2    3  4 5  6
//! ```
//!
//! Each bit names the subtree holding the least recently used way. The LRU
//! way is read by following the bits from the root, collecting one direction
//! bit per level (MSB first). An access walks the path spelled by the accessed
//! way's index and flips each visited node to point at the other subtree.
//!
//! # Performance
//!
//! - **Time Complexity:** `lru()` and `access()` are O(log2 W)
//! - **Space Complexity:** W-1 bits per set
//! - **Hardware Cost:** Low - one mux chain per level

use super::ReplacementPolicy;
use crate::common::bits::clog2;
use crate::common::constants::MAX_MATCH_WIDTH;
use crate::common::error::ConfigError;

/// The PLRU tree for one set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Plru {
    /// Node bits, bit `n` holds node `n`.
    tree: u64,
    /// Tree depth, `log2(ways)`.
    levels: u32,
}

impl Plru {
    /// Creates a cleared tree for `ways` ways.
    ///
    /// # Arguments
    ///
    /// * `ways` - Associativity; a power of two in 1..=64.
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
        if ways > MAX_MATCH_WIDTH {
            return Err(ConfigError::TooLarge {
                what: "ways",
                value: ways,
                max: MAX_MATCH_WIDTH,
            });
        }
        Ok(Self {
            tree: 0,
            levels: clog2(ways),
        })
    }

    /// Number of ways tracked by the tree.
    pub const fn ways(&self) -> usize {
        1 << self.levels
    }

    /// Raw node bits.
    pub const fn tree_bits(&self) -> u64 {
        self.tree
    }

    const fn node(&self, node: usize) -> usize {
        ((self.tree >> node) & 1) as usize
    }

    /// Current least recently used way. Does not mutate the tree.
    pub const fn lru(&self) -> usize {
        let mut node = 0;
        let mut lru = 0;
        let mut level = 0;
        while level < self.levels {
            let dir = self.node(node);
            lru = (lru << 1) | dir;
            node = 2 * node + 1 + dir;
            level += 1;
        }
        lru
    }

    /// Marks `way` as most recently used.
    ///
    /// Every node on the path to `way` is set to the complement of the
    /// direction taken, pointing the LRU walk away from it.
    pub const fn access(&mut self, way: usize) {
        let mut node = 0;
        let mut level = 0;
        while level < self.levels {
            let dir = (way >> (self.levels - 1 - level)) & 1;
            if dir == 0 {
                self.tree |= 1 << node;
            } else {
                self.tree &= !(1 << node);
            }
            node = 2 * node + 1 + dir;
            level += 1;
        }
    }

    /// One clock of the PLRU block.
    ///
    /// # Arguments
    ///
    /// * `acc_index` - Way accessed this cycle.
    /// * `acc_enable` - Whether an access happened.
    ///
    /// # Returns
    ///
    /// The LRU way presented during the cycle, before the access commits.
    pub const fn evaluate(&mut self, acc_index: usize, acc_enable: bool) -> usize {
        let lru = self.lru();
        if acc_enable {
            self.access(acc_index);
        }
        lru
    }

    /// Clears every node bit.
    pub const fn clear(&mut self) {
        self.tree = 0;
    }
}

/// PLRU policy: one independent tree per set.
#[derive(Clone, Debug)]
pub struct PlruPolicy {
    trees: Vec<Plru>,
}

impl PlruPolicy {
    /// Creates a new PLRU policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets.
    /// * `ways` - The associativity of each set.
    pub fn new(sets: usize, ways: usize) -> Result<Self, ConfigError> {
        let tree = Plru::new(ways)?;
        Ok(Self {
            trees: vec![tree; sets],
        })
    }

    /// The tree owned by `set`.
    pub fn tree(&self, set: usize) -> Option<&Plru> {
        self.trees.get(set)
    }
}

impl ReplacementPolicy for PlruPolicy {
    fn update(&mut self, set: usize, way: usize) {
        self.trees[set].access(way);
    }

    fn get_victim(&self, set: usize) -> usize {
        self.trees[set].lru()
    }

    fn reset(&mut self) {
        for tree in &mut self.trees {
            tree.clear();
        }
    }
}

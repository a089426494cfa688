//! Bit-level coverage tracking for multi-writer pins and signals.
//!
//! A chip output may be assembled from several partial writes, and a part
//! input pin may be fed from several partial connections, as long as no bit
//! is claimed twice.

use nandsim_ir::BitRange;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Claimed bit indices per key.
#[derive(Debug)]
pub struct Coverage<K> {
    claimed: HashMap<K, HashSet<u32>>,
}

impl<K: Eq + Hash> Default for Coverage<K> {
    fn default() -> Self {
        Self {
            claimed: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> Coverage<K> {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims every bit of `range` under `key`.
    ///
    /// Returns `false`, claiming nothing, when any bit is already taken.
    pub fn claim(&mut self, key: K, range: BitRange) -> bool {
        let bits = self.claimed.entry(key).or_default();
        if range.indices().any(|i| bits.contains(&i)) {
            return false;
        }
        bits.extend(range.indices());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disjoint_ranges_are_accepted() {
        let mut cov = Coverage::new();
        assert!(cov.claim("out", BitRange::new(0, 7)));
        assert!(cov.claim("out", BitRange::new(8, 15)));
    }

    #[test]
    fn overlap_is_rejected_without_side_effects() {
        let mut cov = Coverage::new();
        assert!(cov.claim("out", BitRange::new(2, 4)));
        assert!(!cov.claim("out", BitRange::new(4, 6)));
        // bits 5 and 6 were not claimed by the failed attempt
        assert!(cov.claim("out", BitRange::new(5, 6)));
    }

    #[test]
    fn keys_are_independent() {
        let mut cov = Coverage::new();
        assert!(cov.claim((0usize, "a"), BitRange::full(1)));
        assert!(cov.claim((1usize, "a"), BitRange::full(1)));
        assert!(!cov.claim((0usize, "a"), BitRange::full(1)));
    }
}

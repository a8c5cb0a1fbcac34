//! Per-chromosome index into a flat item buffer
//!
//! Every store keeps its items in one contiguous Vec, grouped by
//! chromosome; the index maps a chromosome id to the half-closed slot
//! range its items occupy. Traversal order comes from a sorted snapshot
//! of the keys, so iteration is always ascending regardless of the order
//! chromosome blocks appeared in the file.

use std::collections::HashMap;
use std::ops::Range;

use super::chrom::ChromId;
use super::error::{BedsiftError, Result};

/// Slot range of one chromosome's items within the store buffer.
/// `first` and `last` are both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromRange {
    /// Cleared when a cross-reference leaves this chromosome out
    pub treated: bool,
    pub first: usize,
    pub last: usize,
}

impl ChromRange {
    /// Build from a half-open `[first, end)` slot span; `end > first`.
    pub fn new(first: usize, end: usize) -> Self {
        debug_assert!(end > first);
        Self {
            treated: true,
            first,
            last: end - 1,
        }
    }

    /// Number of items in the range
    pub fn count(&self) -> usize {
        self.last - self.first + 1
    }

    /// Half-open slot range for slicing the buffer
    pub fn bounds(&self) -> Range<usize> {
        self.first..self.last + 1
    }
}

/// Chromosome id to slot range map for one store
#[derive(Debug, Default, Clone)]
pub struct ChromIndex {
    ranges: HashMap<ChromId, ChromRange>,
}

impl ChromIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a chromosome's slot range. Each id is inserted at most
    /// once per ingestion; a duplicate means the input interleaved
    /// chromosome blocks and the later block wins.
    pub fn insert(&mut self, id: ChromId, range: ChromRange) {
        self.ranges.insert(id, range);
    }

    pub fn find(&self, id: ChromId) -> Option<&ChromRange> {
        self.ranges.get(&id)
    }

    pub fn find_mut(&mut self, id: ChromId) -> Option<&mut ChromRange> {
        self.ranges.get_mut(&id)
    }

    pub fn contains(&self, id: ChromId) -> bool {
        self.ranges.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Chromosome ids in ascending order
    pub fn sorted_ids(&self) -> Vec<ChromId> {
        let mut ids: Vec<ChromId> = self.ranges.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Snapshot of (id, range) pairs in ascending chromosome order.
    /// Ranges are copied, so the index stays free for mutation.
    pub fn sorted_entries(&self) -> Vec<(ChromId, ChromRange)> {
        let mut entries: Vec<(ChromId, ChromRange)> =
            self.ranges.iter().map(|(id, r)| (*id, *r)).collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        entries
    }

    /// Ids of chromosomes still marked as treated, ascending
    pub fn treated_ids(&self) -> Vec<ChromId> {
        let mut ids: Vec<ChromId> = self
            .ranges
            .iter()
            .filter(|(_, r)| r.treated)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Clear the treated flag of every chromosome absent from `other`,
    /// and vice versa. Returns the number of shared chromosomes; zero
    /// shared chromosomes is fatal.
    pub fn cross_reference(&mut self, other: &mut ChromIndex) -> Result<usize> {
        let mut common = 0usize;
        for (id, range) in self.ranges.iter_mut() {
            if other.ranges.contains_key(id) {
                common += 1;
            } else {
                range.treated = false;
                log::warn!("{} is missing from the second input; skipped", id);
            }
        }
        for (id, range) in other.ranges.iter_mut() {
            if !self.ranges.contains_key(id) {
                range.treated = false;
                log::warn!("{} is missing from the first input; skipped", id);
            }
        }
        if common == 0 {
            return Err(BedsiftError::NoCommonChromosomes);
        }
        Ok(common)
    }
}

//! Items stored per chromosome and their geometry checks
//!
//! Reads and features share one ingestion loop through the `ItemKind`
//! trait: each kind supplies its own construction (score filtering for
//! reads) and its own check of a candidate region against the previously
//! accepted item on the same chromosome.

use super::ambig::{AmbigCase, AmbigEngine, Decision, EntityKind};
use super::error::{LineContext, Result};

/// Tolerance when probing whether all features share one length
const UNIFORM_LEN_TOLERANCE: i64 = 10;

/// Sentinel start marking an item for removal during a compaction sweep
pub(crate) const REMOVED: u64 = u64::MAX;

/// Half-open genomic interval `[start, end)` on one chromosome
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start: u64,
    pub end: u64,
}

impl Region {
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(start < end);
        Self { start, end }
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// `next` starts exactly where this region ends
    pub fn adjoins(&self, next: &Region) -> bool {
        self.end == next.start
    }

    /// One of the pair contains the other
    pub fn covers(&self, other: &Region) -> bool {
        (self.start <= other.start && other.end <= self.end)
            || (other.start <= self.start && self.end <= other.end)
    }

    /// The regions overlap
    pub fn crosses(&self, other: &Region) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Widen (or shrink, for negative `ext`) both ends, clamping to the
    /// chromosome. At least one position always survives.
    pub fn extend(&mut self, ext: i64, chrom_len: u64) {
        let start = self.start as i64 - ext;
        self.start = if start < 0 { 0 } else { start as u64 };
        let end = self.end as i64 + ext;
        self.end = if end <= self.start as i64 {
            self.start + 1
        } else {
            end as u64
        };
        if chrom_len > 0 && self.end > chrom_len {
            self.end = chrom_len;
            if self.start >= self.end {
                self.start = self.end - 1;
            }
        }
    }
}

/// A sequencing read: start position plus mapping score. The length is
/// shared by the whole store, not held per item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadItem {
    pub pos: u64,
    pub score: f32,
}

/// Shared state of a read store established during ingestion
#[derive(Debug, Clone, Copy)]
pub struct ReadState {
    /// Canonical read length, fixed by the first accepted read
    pub read_len: u64,
    /// Reads scoring at or below this are filtered out
    pub min_score: Option<f32>,
    /// Highest score seen among accepted reads
    pub max_score: f32,
}

impl ReadState {
    pub fn new(min_score: Option<f32>) -> Self {
        Self {
            read_len: 0,
            min_score,
            max_score: 0.0,
        }
    }
}

/// An enriched-region feature: interval plus score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureItem {
    pub region: Region,
    pub score: f32,
}

/// Shared state of a feature store established during ingestion
#[derive(Debug, Clone, Copy)]
pub struct FeatureState {
    /// Features shorter than this raise the TooShort case
    pub min_len: Option<u64>,
    /// Highest score seen among accepted features
    pub max_score: f32,
    /// Whether every feature so far has (roughly) the same length
    uniform_len: bool,
    probe_len: i64,
}

impl FeatureState {
    pub fn new(min_len: Option<u64>) -> Self {
        Self {
            min_len,
            max_score: 0.0,
            uniform_len: true,
            probe_len: 0,
        }
    }

    /// True when all accepted features had lengths within tolerance of
    /// each other. A feature list that looks like this is usually a read
    /// list loaded by mistake.
    pub fn uniform_length(&self) -> bool {
        self.uniform_len
    }

    fn probe_length(&mut self, len: u64) {
        if !self.uniform_len {
            return;
        }
        if self.probe_len == 0 {
            self.probe_len = len as i64;
        } else {
            self.uniform_len = (self.probe_len - len as i64).abs() <= UNIFORM_LEN_TOLERANCE;
        }
    }
}

/// One kind of stored item: how to build it from a record and how to
/// check a new candidate against the previous accepted item.
pub trait ItemKind: Copy {
    type State;

    const ENTITY: EntityKind;

    /// The genomic interval this item occupies
    fn region(&self, state: &Self::State) -> Region;

    /// Sort key within a chromosome
    fn start(&self) -> u64;

    fn set_removed(&mut self);

    fn is_removed(&self) -> bool;

    /// Check `rgn` against the previous accepted item. Returns whether the
    /// candidate should be appended; a Merge decision mutates `prev`
    /// instead.
    fn check_against(
        prev: &mut Self,
        rgn: &Region,
        state: &mut Self::State,
        engine: &mut AmbigEngine,
        ctx: &LineContext,
    ) -> Result<bool>;

    /// Build the item, or None when it is filtered out by score
    fn build(rgn: &Region, score: Option<f32>, state: &mut Self::State) -> Option<Self>;
}

impl ItemKind for ReadItem {
    type State = ReadState;

    const ENTITY: EntityKind = EntityKind::Read;

    fn region(&self, state: &Self::State) -> Region {
        Region {
            start: self.pos,
            end: self.pos + state.read_len.max(1),
        }
    }

    fn start(&self) -> u64 {
        self.pos
    }

    fn set_removed(&mut self) {
        self.pos = REMOVED;
    }

    fn is_removed(&self) -> bool {
        self.pos == REMOVED
    }

    fn check_against(
        prev: &mut Self,
        rgn: &Region,
        state: &mut Self::State,
        engine: &mut AmbigEngine,
        ctx: &LineContext,
    ) -> Result<bool> {
        if state.read_len != 0
            && state.read_len != rgn.len()
            && engine.treat_case(AmbigCase::DifferentSize, ctx)? == Decision::Reject
        {
            return Ok(false);
        }
        if rgn.start == prev.pos
            && engine.treat_case(AmbigCase::Duplicate, ctx)? == Decision::Reject
        {
            return Ok(false);
        }
        Ok(true)
    }

    fn build(rgn: &Region, score: Option<f32>, state: &mut Self::State) -> Option<Self> {
        let score = score.unwrap_or(0.0);
        if let Some(min) = state.min_score {
            if score <= min {
                return None;
            }
        }
        if state.read_len == 0 {
            state.read_len = rgn.len();
        }
        if score > state.max_score {
            state.max_score = score;
        }
        Some(ReadItem {
            pos: rgn.start,
            score,
        })
    }
}

impl ItemKind for FeatureItem {
    type State = FeatureState;

    const ENTITY: EntityKind = EntityKind::Feature;

    fn region(&self, _state: &Self::State) -> Region {
        self.region
    }

    fn start(&self) -> u64 {
        self.region.start
    }

    fn set_removed(&mut self) {
        self.region.start = REMOVED;
    }

    fn is_removed(&self) -> bool {
        self.region.start == REMOVED
    }

    fn check_against(
        prev: &mut Self,
        rgn: &Region,
        state: &mut Self::State,
        engine: &mut AmbigEngine,
        ctx: &LineContext,
    ) -> Result<bool> {
        let prev_rgn = prev.region;
        if *rgn == prev_rgn {
            return Ok(engine.treat_case(AmbigCase::Duplicate, ctx)? != Decision::Reject);
        }
        if let Some(min) = state.min_len {
            if rgn.len() < min {
                return Ok(engine.treat_case(AmbigCase::TooShort, ctx)? != Decision::Reject);
            }
        }
        if prev_rgn.adjoins(rgn) {
            let decision = engine.treat_case(AmbigCase::Adjacent, ctx)?;
            return Ok(merge_into(prev, rgn, decision));
        }
        if prev_rgn.covers(rgn) {
            return Ok(engine.treat_case(AmbigCase::Covered, ctx)? != Decision::Reject);
        }
        if prev_rgn.crosses(rgn) {
            let decision = engine.treat_case(AmbigCase::Crossed, ctx)?;
            return Ok(merge_into(prev, rgn, decision));
        }
        Ok(true)
    }

    fn build(rgn: &Region, score: Option<f32>, state: &mut Self::State) -> Option<Self> {
        state.probe_length(rgn.len());
        let score = score.unwrap_or(1.0);
        if score > state.max_score {
            state.max_score = score;
        }
        Some(FeatureItem {
            region: *rgn,
            score,
        })
    }
}

/// Apply a Crossed/Adjacent decision: Merge widens the previous feature
/// to the candidate's end and drops the candidate.
fn merge_into(prev: &mut FeatureItem, rgn: &Region, decision: Decision) -> bool {
    match decision {
        Decision::Accept => true,
        Decision::Merge => {
            if rgn.end > prev.region.end {
                prev.region.end = rgn.end;
            }
            false
        }
        Decision::Reject => false,
    }
}

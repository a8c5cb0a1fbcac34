//! Ingestion of line-oriented interval records into per-chromosome stores
//!
//! Records arrive grouped by chromosome (the usual BED layout). One pass
//! builds the flat item buffer and the chromosome index, dispatching every
//! geometric oddity through the ambiguity engine. Items that arrived
//! unsorted within a chromosome get a sort-and-recheck pass at the end, so
//! the accepted result is always ascending per chromosome.

use super::ambig::{AmbigCase, AmbigEngine};
use super::chrom::{ChromId, ChromScope, ChromSizes};
use super::error::{BedsiftError, LineContext, Result};
use super::index::{ChromIndex, ChromRange};
use super::items::{FeatureItem, FeatureState, ItemKind, ReadItem, ReadState};

/// One parsed data record, borrowed from the source's line buffer
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    pub chrom: &'a str,
    pub start: i64,
    pub end: i64,
    pub score: Option<f32>,
    /// Physical 1-based line number
    pub line: u64,
}

/// A stream of data records from one input file. Comment and header lines
/// are the source's business and never reach ingestion.
pub trait RecordSource {
    /// Display name for errors and statistics
    fn file_name(&self) -> &str;

    /// Rough record count for pre-allocation; 0 when unknown
    fn estimated_records(&self) -> usize;

    fn next_record(&mut self) -> Result<Option<Record<'_>>>;
}

struct IngestOutcome<K> {
    items: Vec<K>,
    index: ChromIndex,
    file: String,
    lines: u64,
    treated_chrom: Option<ChromId>,
}

/// Mutable state of one ingestion pass
struct Session {
    /// Last chromosome name seen, including negligible ones
    curr_name: String,
    /// Id of `curr_name` (UNDEFINED while on a negligible run)
    curr_id: ChromId,
    /// Last recognized id, for the block-order check
    last_valid: ChromId,
    /// Id and first slot of the block currently being filled
    open: Option<(ChromId, usize)>,
    need_global_sort: bool,
    /// Length of the open block's chromosome, 0 when unknown
    chrom_len: u64,
    prev_start: u64,
    /// Data records consumed, negligible ones included
    lines: u64,
    treated_one: Option<ChromId>,
    treated_multi: bool,
}

impl Session {
    fn new() -> Self {
        Self {
            curr_name: String::new(),
            curr_id: ChromId::UNDEFINED,
            last_valid: ChromId::UNDEFINED,
            open: None,
            need_global_sort: false,
            chrom_len: 0,
            prev_start: 0,
            lines: 0,
            treated_one: None,
            treated_multi: false,
        }
    }

    fn note_treated(&mut self, id: ChromId) {
        match self.treated_one {
            Some(t) if t != id => self.treated_multi = true,
            None => self.treated_one = Some(id),
            _ => {}
        }
    }

    fn treated_chrom(&self) -> Option<ChromId> {
        if self.treated_multi {
            None
        } else {
            self.treated_one
        }
    }
}

/// Core ingestion loop shared by read and feature stores.
///
/// `lines` counts every data record, so the statistics pass can reconcile
/// records that vanished on unrecognized chromosomes.
fn ingest<K: ItemKind, R: RecordSource + ?Sized>(
    source: &mut R,
    scope: ChromScope,
    sizes: Option<&ChromSizes>,
    engine: &mut AmbigEngine,
    state: &mut K::State,
) -> Result<IngestOutcome<K>> {
    let file = source.file_name().to_string();
    let estimated = source.estimated_records();
    let mut items: Vec<K> = Vec::with_capacity(estimated);
    let mut index = ChromIndex::new();

    let mut s = Session::new();

    while let Some(rec) = source.next_record()? {
        s.lines += 1;
        if rec.chrom != s.curr_name.as_str() {
            let next = ChromId::from_name(rec.chrom);
            s.curr_name.clear();
            s.curr_name.push_str(rec.chrom);
            s.curr_id = next;
            if next.is_negligible() {
                // previous block stays open across negligible runs
                continue;
            }
            // a name alias ("chr1" then "1") or a name change straight
            // after a negligible run may resolve to the still-open block;
            // that block keeps filling
            if s.open.map(|(id, _)| id) != Some(next) {
                // chrM floats: reference orders place it first or last,
                // so it never counts towards block disorder
                if !s.last_valid.is_negligible()
                    && next < s.last_valid
                    && next != ChromId::M
                    && s.last_valid != ChromId::M
                {
                    s.need_global_sort = true;
                }
                s.last_valid = next;
                match scope {
                    ChromScope::All => {
                        if let Some((id, first)) = s.open.take() {
                            if items.len() > first {
                                index.insert(id, ChromRange::new(first, items.len()));
                            }
                        }
                    }
                    ChromScope::Single(stated) => {
                        if s.open.is_some() {
                            // the stated chromosome's block is behind us
                            break;
                        }
                        if s.need_global_sort {
                            return Err(BedsiftError::UnsortedSingleChrom {
                                file: file.clone(),
                            });
                        }
                        if next != stated {
                            continue;
                        }
                    }
                }
                log::debug!("{}: reading {} at item {}", file, next, items.len());
                s.open = Some((next, items.len()));
                s.chrom_len = sizes.and_then(|sz| sz.get(next)).unwrap_or(0);
                s.note_treated(next);
            }
        } else {
            if s.curr_id.is_negligible() {
                continue;
            }
            if let ChromScope::Single(stated) = scope {
                if s.curr_id != stated {
                    continue;
                }
            }
        }

        let ctx = LineContext {
            file: &file,
            line: rec.line,
        };
        let rgn = match engine.init_region(rec.start, rec.end, s.chrom_len, &ctx)? {
            Some(rgn) => rgn,
            None => continue,
        };
        let first = match s.open {
            Some((_, first)) => first,
            None => continue,
        };
        if items.len() > first {
            if rgn.start < s.prev_start {
                engine.unsorted_items = true;
            }
            let last = items.len() - 1;
            if !K::check_against(&mut items[last], &rgn, state, engine, &ctx)? {
                continue;
            }
        }
        match K::build(&rgn, rec.score, state) {
            Some(item) => items.push(item),
            None => {
                engine.treat_case(AmbigCase::FilteredByScore, &ctx)?;
            }
        }
        s.prev_start = rgn.start;
    }

    if let Some((id, first)) = s.open.take() {
        if items.len() > first {
            index.insert(id, ChromRange::new(first, items.len()));
        }
    }
    if !items.is_empty() {
        if estimated > items.len() * 2 {
            items.shrink_to_fit();
        }
        if engine.unsorted_items {
            log::warn!("{}: unsorted {}; sorting", file, K::ENTITY.name(true));
            sort_and_recheck(&mut items, &mut index, state, engine, &file)?;
        }
    }
    if items.is_empty() {
        return Err(BedsiftError::NoItems {
            file,
            entity: K::ENTITY.name(true),
            scope: match scope {
                ChromScope::All => String::new(),
                ChromScope::Single(id) => format!(" per {}", id),
            },
        });
    }

    Ok(IngestOutcome {
        items,
        index,
        file,
        lines: s.lines,
        treated_chrom: s.treated_chrom(),
    })
}

/// Re-sort each chromosome's slice and re-run the pairwise check against
/// the last kept item; rejected items are marked and compacted out in one
/// sweep.
fn sort_and_recheck<K: ItemKind>(
    items: &mut Vec<K>,
    index: &mut ChromIndex,
    state: &mut K::State,
    engine: &mut AmbigEngine,
    file: &str,
) -> Result<()> {
    let ctx = LineContext { file, line: 0 };
    for (_, rng) in index.sorted_entries() {
        items[rng.bounds()].sort_unstable_by_key(|item| item.start());
        let mut prev = rng.first;
        for i in rng.first + 1..=rng.last {
            let rgn = items[i].region(state);
            if K::check_against(&mut items[prev], &rgn, state, engine, &ctx)? {
                prev = i;
            } else {
                items[i].set_removed();
            }
        }
    }
    compact(items, index);
    Ok(())
}

/// Drop marked items and rebuild the buffer chromosome by chromosome.
/// Each range gets fresh offsets taken from the rebuilt buffer, so blocks
/// that arrived in any file order end up laid out in id order. The first
/// item of a chromosome is never marked, so no range empties out.
pub(crate) fn compact<K: ItemKind>(items: &mut Vec<K>, index: &mut ChromIndex) -> usize {
    let mut kept: Vec<K> = Vec::with_capacity(items.len());
    for (id, rng) in index.sorted_entries() {
        let first = kept.len();
        for i in rng.bounds() {
            if !items[i].is_removed() {
                kept.push(items[i]);
            }
        }
        debug_assert!(kept.len() > first);
        if let Some(r) = index.find_mut(id) {
            r.first = first;
            r.last = kept.len() - 1;
        }
    }
    let removed = items.len() - kept.len();
    *items = kept;
    removed
}

/// Per-chromosome store of read start positions
pub struct ReadStore {
    pub(crate) items: Vec<ReadItem>,
    pub(crate) index: ChromIndex,
    state: ReadState,
    file: String,
    lines: u64,
    treated_chrom: Option<ChromId>,
}

impl ReadStore {
    /// Ingest a read list. Score filtering happens before any item is
    /// stored, so filtered reads never participate in geometry checks.
    pub fn load<R: RecordSource + ?Sized>(
        source: &mut R,
        scope: ChromScope,
        sizes: Option<&ChromSizes>,
        min_score: Option<f32>,
        engine: &mut AmbigEngine,
    ) -> Result<Self> {
        let mut state = ReadState::new(min_score);
        let outcome = ingest::<ReadItem, R>(source, scope, sizes, engine, &mut state)?;
        Ok(Self {
            items: outcome.items,
            index: outcome.index,
            state,
            file: outcome.file,
            lines: outcome.lines,
            treated_chrom: outcome.treated_chrom,
        })
    }

    /// Canonical read length established by the first accepted read
    pub fn read_len(&self) -> u64 {
        self.state.read_len
    }

    /// Highest mapping score among accepted reads
    pub fn max_score(&self) -> f32 {
        self.state.max_score
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Data records seen in the input
    pub fn lines(&self) -> u64 {
        self.lines
    }

    pub fn file_name(&self) -> &str {
        &self.file
    }

    pub fn index(&self) -> &ChromIndex {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut ChromIndex {
        &mut self.index
    }

    /// The single chromosome all items landed on, if there was only one
    pub fn treated_chrom(&self) -> Option<ChromId> {
        self.treated_chrom
    }

    /// Reads of one chromosome, ascending by position
    pub fn reads(&self, id: ChromId) -> Option<&[ReadItem]> {
        self.index.find(id).map(|rng| &self.items[rng.bounds()])
    }
}

/// Per-chromosome store of features
pub struct FeatureStore {
    pub(crate) items: Vec<FeatureItem>,
    pub(crate) index: ChromIndex,
    state: FeatureState,
    file: String,
    lines: u64,
    treated_chrom: Option<ChromId>,
}

impl FeatureStore {
    pub fn load<R: RecordSource + ?Sized>(
        source: &mut R,
        scope: ChromScope,
        sizes: Option<&ChromSizes>,
        min_len: Option<u64>,
        engine: &mut AmbigEngine,
    ) -> Result<Self> {
        let mut state = FeatureState::new(min_len);
        let outcome = ingest::<FeatureItem, R>(source, scope, sizes, engine, &mut state)?;
        Ok(Self {
            items: outcome.items,
            index: outcome.index,
            state,
            file: outcome.file,
            lines: outcome.lines,
            treated_chrom: outcome.treated_chrom,
        })
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn lines(&self) -> u64 {
        self.lines
    }

    pub fn file_name(&self) -> &str {
        &self.file
    }

    pub fn index(&self) -> &ChromIndex {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut ChromIndex {
        &mut self.index
    }

    pub fn treated_chrom(&self) -> Option<ChromId> {
        self.treated_chrom
    }

    pub fn max_score(&self) -> f32 {
        self.state.max_score
    }

    /// Whether accepted features all have (roughly) one length; such a
    /// list is usually a read list loaded by mistake.
    pub fn uniform_length(&self) -> bool {
        self.state.uniform_length()
    }

    /// Features of one chromosome, ascending by start
    pub fn features(&self, id: ChromId) -> Option<&[FeatureItem]> {
        self.index.find(id).map(|rng| &self.items[rng.bounds()])
    }

    /// Normalize scores to [0, 1] by the maximum seen
    pub fn scale_scores(&mut self) {
        let max = self.state.max_score;
        if max > 0.0 {
            for item in &mut self.items {
                item.score /= max;
            }
        }
    }

    /// Total treated length of one chromosome's features, each widened by
    /// `frag_len` on both sides
    pub fn treated_length(&self, id: ChromId, frag_len: u64) -> Option<u64> {
        self.features(id).map(|items| {
            items
                .iter()
                .map(|f| f.region.len() + 2 * frag_len)
                .sum()
        })
    }

    /// Warn when features shorter than `len` are present; returns how many
    pub fn check_min_length(&self, len: u64) -> usize {
        let short = self
            .items
            .iter()
            .filter(|f| f.region.len() < len)
            .count();
        if short > 0 {
            log::warn!(
                "{}: {} features shorter than {}",
                self.file,
                short,
                len
            );
        }
        short
    }

    /// Widen every feature by `ext` on both sides and merge the overlaps
    /// that creates. Returns the number of features merged away.
    pub fn extend(
        &mut self,
        ext: i64,
        sizes: Option<&ChromSizes>,
        engine: &mut AmbigEngine,
    ) -> Result<usize> {
        super::extend::extend_features(&mut self.items, &mut self.index, ext, sizes, engine, &self.file)
    }
}

impl std::fmt::Debug for ReadStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadStore")
            .field("file", &self.file)
            .field("items", &self.items.len())
            .field("chroms", &self.index.len())
            .finish()
    }
}

impl std::fmt::Debug for FeatureStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureStore")
            .field("file", &self.file)
            .field("items", &self.items.len())
            .field("chroms", &self.index.len())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::VecSource;
    use super::*;
    use crate::core::items::Region;

    fn id(name: &str) -> ChromId {
        ChromId::from_name(name)
    }

    fn load_features(recs: &[(&str, i64, i64)]) -> Result<FeatureStore> {
        let mut source = VecSource::new(recs);
        let mut engine = AmbigEngine::for_features(false);
        FeatureStore::load(&mut source, ChromScope::All, None, None, &mut engine)
    }

    #[test]
    fn test_grouping_by_chromosome() {
        let store = load_features(&[
            ("chr1", 100, 200),
            ("chr1", 300, 400),
            ("chr2", 50, 80),
        ])
        .unwrap();
        assert_eq!(store.total(), 3);
        assert_eq!(store.features(id("chr1")).unwrap().len(), 2);
        assert_eq!(store.features(id("chr2")).unwrap().len(), 1);
        assert!(store.features(id("chr3")).is_none());
        assert_eq!(store.treated_chrom(), None);
    }

    #[test]
    fn test_adjacent_features_merge() {
        let store = load_features(&[("chr1", 100, 200), ("chr1", 200, 260)]).unwrap();
        let items = store.features(id("chr1")).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].region, Region::new(100, 260));
    }

    #[test]
    fn test_negligible_lines_skipped_but_counted() {
        let store = load_features(&[
            ("chr1", 100, 200),
            ("chr1_gl000191_random", 5, 50),
            ("chr1_gl000191_random", 60, 90),
            ("chr2", 10, 30),
        ])
        .unwrap();
        assert_eq!(store.total(), 2);
        assert_eq!(store.lines(), 4);
        // the chr1 block survived the negligible run
        assert_eq!(store.features(id("chr1")).unwrap().len(), 1);
    }

    #[test]
    fn test_out_of_order_blocks_still_traverse_ascending() {
        let store = load_features(&[
            ("chrX", 100, 200),
            ("chr2", 50, 80),
            ("chr10", 5, 25),
        ])
        .unwrap();
        assert_eq!(
            store.index().sorted_ids(),
            vec![id("chr2"), id("chr10"), id("chrX")]
        );
    }

    #[test]
    fn test_mitochondrial_block_never_flags_disorder() {
        let mut source = VecSource::new(&[("chrM", 100, 200), ("chr1", 50, 80)]);
        let mut engine = AmbigEngine::for_features(false);
        // chrM sorts last but conventionally appears first
        let store = FeatureStore::load(
            &mut source,
            ChromScope::Single(id("chr1")),
            None,
            None,
            &mut engine,
        );
        assert!(store.is_ok());
    }

    #[test]
    fn test_single_scope_skips_other_chromosomes() {
        let mut source = VecSource::new(&[
            ("chr1", 100, 200),
            ("chr2", 50, 80),
            ("chr2", 90, 120),
            ("chr3", 10, 30),
        ]);
        let mut engine = AmbigEngine::for_features(false);
        let store = FeatureStore::load(
            &mut source,
            ChromScope::Single(id("chr2")),
            None,
            None,
            &mut engine,
        )
        .unwrap();
        assert_eq!(store.total(), 2);
        assert_eq!(store.treated_chrom(), Some(id("chr2")));
        assert!(store.features(id("chr1")).is_none());
    }

    #[test]
    fn test_single_scope_absent_chromosome_is_fatal() {
        let mut source = VecSource::new(&[("chr1", 100, 200)]);
        let mut engine = AmbigEngine::for_features(false);
        let err = FeatureStore::load(
            &mut source,
            ChromScope::Single(id("chr7")),
            None,
            None,
            &mut engine,
        )
        .unwrap_err();
        assert!(matches!(err, BedsiftError::NoItems { .. }));
    }

    #[test]
    fn test_single_scope_unsorted_blocks_fatal() {
        let mut source = VecSource::new(&[
            ("chr5", 100, 200),
            ("chr2", 50, 80),
            ("chr7", 10, 30),
        ]);
        let mut engine = AmbigEngine::for_features(false);
        let err = FeatureStore::load(
            &mut source,
            ChromScope::Single(id("chr7")),
            None,
            None,
            &mut engine,
        )
        .unwrap_err();
        assert!(matches!(err, BedsiftError::UnsortedSingleChrom { .. }));
    }

    #[test]
    fn test_unsorted_within_chromosome_matches_presorted() {
        let unsorted = load_features(&[
            ("chr1", 300, 400),
            ("chr1", 100, 200),
            ("chr1", 200, 260),
        ])
        .unwrap();
        let sorted = load_features(&[
            ("chr1", 100, 200),
            ("chr1", 200, 260),
            ("chr1", 300, 400),
        ])
        .unwrap();
        let a: Vec<Region> = unsorted
            .features(id("chr1"))
            .unwrap()
            .iter()
            .map(|f| f.region)
            .collect();
        let b: Vec<Region> = sorted
            .features(id("chr1"))
            .unwrap()
            .iter()
            .map(|f| f.region)
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_recheck_drops_duplicates_found_after_sorting() {
        let store = load_features(&[
            ("chr1", 500, 600),
            ("chr1", 100, 200),
            ("chr1", 500, 600),
        ])
        .unwrap();
        let items = store.features(id("chr1")).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].region, Region::new(100, 200));
        assert_eq!(items[1].region, Region::new(500, 600));
    }

    #[test]
    fn test_recheck_after_out_of_order_blocks() {
        // chrX arrives before chr2, so the buffer is not in id order when
        // the recheck pass rebuilds it
        let store = load_features(&[
            ("chrX", 500, 600),
            ("chrX", 100, 200),
            ("chrX", 500, 600),
            ("chr2", 10, 30),
        ])
        .unwrap();
        let x = store.features(id("chrX")).unwrap();
        assert_eq!(x.len(), 2);
        assert_eq!(x[0].region, Region::new(100, 200));
        assert_eq!(x[1].region, Region::new(500, 600));
        let chr2 = store.features(id("chr2")).unwrap();
        assert_eq!(chr2.len(), 1);
        assert_eq!(chr2[0].region, Region::new(10, 30));
    }

    #[test]
    fn test_block_resumes_after_negligible_run() {
        let store = load_features(&[
            ("chr1", 100, 200),
            ("chr1_gl000191_random", 5, 50),
            ("chr1", 300, 400),
        ])
        .unwrap();
        assert_eq!(store.total(), 2);
        let items = store.features(id("chr1")).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].region, Region::new(300, 400));
    }

    #[test]
    fn test_chromosome_name_alias_continues_block() {
        let store = load_features(&[("chr1", 100, 200), ("1", 300, 400)]).unwrap();
        assert_eq!(store.features(id("chr1")).unwrap().len(), 2);
        assert_eq!(store.treated_chrom(), Some(id("chr1")));
    }

    #[test]
    fn test_recheck_shifts_later_chromosome_ranges() {
        let store = load_features(&[
            ("chr1", 500, 600),
            ("chr1", 100, 200),
            ("chr1", 500, 600),
            ("chr2", 10, 30),
            ("chr2", 50, 90),
        ])
        .unwrap();
        let chr2 = store.features(id("chr2")).unwrap();
        assert_eq!(chr2.len(), 2);
        assert_eq!(chr2[0].region, Region::new(10, 30));
    }

    #[test]
    fn test_exceeding_chromosome_length_dropped() {
        let mut sizes = ChromSizes::new();
        sizes.insert(id("chr1"), 1000);
        let mut source = VecSource::new(&[("chr1", 100, 200), ("chr1", 900, 1100)]);
        let mut engine = AmbigEngine::for_features(false);
        let store = FeatureStore::load(
            &mut source,
            ChromScope::All,
            Some(&sizes),
            None,
            &mut engine,
        )
        .unwrap();
        assert_eq!(store.total(), 1);
        assert_eq!(engine.count(AmbigCase::ExceedsChromLen), 1);
    }

    #[test]
    fn test_negative_position_fatal() {
        let mut source = VecSource::new(&[("chr1", -5, 200)]);
        let mut engine = AmbigEngine::for_features(false);
        let err = FeatureStore::load(&mut source, ChromScope::All, None, None, &mut engine)
            .unwrap_err();
        assert!(matches!(err, BedsiftError::NegativePosition { .. }));
    }

    #[test]
    fn test_read_store_score_filter_and_len() {
        let mut source = VecSource::with_scores(&[
            ("chr1", 100, 136, 20.0),
            ("chr1", 150, 186, 5.0),
            ("chr1", 200, 236, 30.0),
        ]);
        let mut engine = AmbigEngine::for_reads(false, false);
        let store = ReadStore::load(
            &mut source,
            ChromScope::All,
            None,
            Some(10.0),
            &mut engine,
        )
        .unwrap();
        assert_eq!(store.total(), 2);
        assert_eq!(store.read_len(), 36);
        assert_eq!(store.max_score(), 30.0);
        assert_eq!(engine.count(AmbigCase::FilteredByScore), 1);
    }

    #[test]
    fn test_read_store_duplicates() {
        let recs = [
            ("chr1", 100, 136),
            ("chr1", 100, 136),
            ("chr1", 150, 186),
        ];
        let mut engine = AmbigEngine::for_reads(false, false);
        let dropped = ReadStore::load(
            &mut VecSource::new(&recs),
            ChromScope::All,
            None,
            None,
            &mut engine,
        )
        .unwrap();
        assert_eq!(dropped.total(), 2);

        let mut engine = AmbigEngine::for_reads(false, true);
        let kept = ReadStore::load(
            &mut VecSource::new(&recs),
            ChromScope::All,
            None,
            None,
            &mut engine,
        )
        .unwrap();
        assert_eq!(kept.total(), 3);
    }

    #[test]
    fn test_scale_scores() {
        let mut source =
            VecSource::with_scores(&[("chr1", 100, 200, 5.0), ("chr1", 300, 400, 20.0)]);
        let mut engine = AmbigEngine::for_features(false);
        let mut store = FeatureStore::load(&mut source, ChromScope::All, None, None, &mut engine)
            .unwrap();
        store.scale_scores();
        let items = store.features(id("chr1")).unwrap();
        assert_eq!(items[0].score, 0.25);
        assert_eq!(items[1].score, 1.0);
    }

    #[test]
    fn test_treated_length() {
        let store = load_features(&[("chr1", 100, 200), ("chr1", 300, 350)]).unwrap();
        // (100 + 2*10) + (50 + 2*10) = 190
        assert_eq!(store.treated_length(id("chr1"), 10), Some(190));
    }
}

//! Post-hoc widening of accepted features
//!
//! After ingestion every feature can be extended by a fixed amount on both
//! sides, clamped to the chromosome. Widening creates fresh overlaps and
//! adjacencies between former neighbours; those go through the same
//! Crossed/Adjacent policy as during ingestion, then one compaction sweep
//! drops the merged-away items and re-aligns the chromosome ranges.

use super::ambig::{AmbigCase, AmbigEngine, Decision};
use super::chrom::ChromSizes;
use super::error::{LineContext, Result};
use super::index::ChromIndex;
use super::ingest::compact;
use super::items::{FeatureItem, ItemKind};

/// Extend every feature by `ext` on both sides. Returns the number of
/// features removed by merging. A zero extension is a no-op.
pub(crate) fn extend_features(
    items: &mut Vec<FeatureItem>,
    index: &mut ChromIndex,
    ext: i64,
    sizes: Option<&ChromSizes>,
    engine: &mut AmbigEngine,
    file: &str,
) -> Result<usize> {
    if ext == 0 || items.is_empty() {
        return Ok(0);
    }
    let ctx = LineContext { file, line: 0 };
    for (id, rng) in index.sorted_entries() {
        let chrom_len = sizes.and_then(|s| s.get(id)).unwrap_or(0);
        items[rng.first].region.extend(ext, chrom_len);
        let mut prev = rng.first;
        for i in rng.first + 1..=rng.last {
            items[i].region.extend(ext, chrom_len);
            let rgn = items[i].region;
            let prev_rgn = items[prev].region;
            let decision = if rgn.start < prev_rgn.end {
                Some(engine.treat_case(AmbigCase::Crossed, &ctx)?)
            } else if rgn.start == prev_rgn.end {
                Some(engine.treat_case(AmbigCase::Adjacent, &ctx)?)
            } else {
                None
            };
            match decision {
                Some(Decision::Merge) => {
                    if rgn.end > items[prev].region.end {
                        items[prev].region.end = rgn.end;
                    }
                    items[i].set_removed();
                }
                Some(Decision::Reject) => {
                    items[i].set_removed();
                }
                Some(Decision::Accept) | None => {
                    prev = i;
                }
            }
        }
    }
    Ok(compact(items, index))
}

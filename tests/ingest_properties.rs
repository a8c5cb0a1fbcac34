//! Property-based tests for BED ingestion
//!
//! Feeds generated feature lists through real files (BedReader) and checks
//! the ordering, disjointness and accounting guarantees of the stores.

use bedsift::core::{AmbigCase, AmbigEngine, ChromId, ChromScope, ChromSizes, FeatureStore};
use bedsift::formats::BedReader;
use bedsift::Region;
use proptest::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

/// Generate a valid chromosome name
fn arb_chrom_name() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u8..=22).prop_map(|n| format!("chr{}", n)),
        Just("chrX".to_string()),
        Just("chrY".to_string()),
    ]
}

/// Generate one interval as (start, end)
fn arb_interval() -> impl Strategy<Value = (u64, u64)> {
    (0u64..100_000, 1u64..2_000).prop_map(|(start, size)| (start, start + size))
}

/// Generate a small list of intervals for one chromosome
fn arb_intervals() -> impl Strategy<Value = Vec<(u64, u64)>> {
    prop::collection::vec(arb_interval(), 1..30)
}

/// Write a BED file with one block per chromosome, blocks in the given order
fn write_bed(blocks: &[(String, Vec<(u64, u64)>)]) -> NamedTempFile {
    let mut temp = NamedTempFile::new().unwrap();
    for (chrom, intervals) in blocks {
        for (start, end) in intervals {
            writeln!(temp, "{}\t{}\t{}", chrom, start, end).unwrap();
        }
    }
    temp.flush().unwrap();
    temp
}

fn ingest(temp: &NamedTempFile, engine: &mut AmbigEngine) -> FeatureStore {
    let mut reader = BedReader::open(temp.path()).unwrap();
    FeatureStore::load(&mut reader, ChromScope::All, None, None, engine).unwrap()
}

fn regions(store: &FeatureStore, id: ChromId) -> Vec<Region> {
    store
        .features(id)
        .map(|items| items.iter().map(|f| f.region).collect())
        .unwrap_or_default()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Accepted features of each chromosome are ascending and separated
    /// under the default policy, whatever order the input came in.
    #[test]
    fn prop_accepted_features_sorted_and_disjoint(
        chrom in arb_chrom_name(),
        intervals in arb_intervals(),
    ) {
        let temp = write_bed(&[(chrom.clone(), intervals)]);
        let mut engine = AmbigEngine::for_features(false);
        let store = ingest(&temp, &mut engine);

        let rgns = regions(&store, ChromId::from_name(&chrom));
        prop_assert!(!rgns.is_empty());
        for pair in rgns.windows(2) {
            prop_assert!(pair[0].end < pair[1].start,
                "regions {:?} and {:?} not separated", pair[0], pair[1]);
        }
    }

    /// Shuffling records within a chromosome never changes the accepted
    /// result: the sort-and-recheck pass restores the sorted outcome.
    #[test]
    fn prop_unsorted_input_equals_presorted(
        chrom in arb_chrom_name(),
        intervals in arb_intervals(),
        seed in 0u64..1000,
    ) {
        let mut sorted = intervals.clone();
        sorted.sort();
        let mut shuffled = intervals;
        // cheap deterministic shuffle
        let n = shuffled.len();
        for i in 0..n {
            let j = ((seed as usize).wrapping_mul(31).wrapping_add(i * 17)) % n;
            shuffled.swap(i, j);
        }

        let mut engine_a = AmbigEngine::for_features(false);
        let store_a = ingest(&write_bed(&[(chrom.clone(), sorted)]), &mut engine_a);
        let mut engine_b = AmbigEngine::for_features(false);
        let store_b = ingest(&write_bed(&[(chrom.clone(), shuffled)]), &mut engine_b);

        let id = ChromId::from_name(&chrom);
        prop_assert_eq!(regions(&store_a, id), regions(&store_b, id));
    }

    /// Every data record is accounted for: accepted plus every counted
    /// case plus the reconciled negligible lines equals the line total.
    #[test]
    fn prop_line_accounting_reconciles(
        intervals in arb_intervals(),
        negligible in 0u64..10,
    ) {
        let mut temp = NamedTempFile::new().unwrap();
        for (start, end) in &intervals {
            writeln!(temp, "chr1\t{}\t{}", start, end).unwrap();
        }
        for k in 0..negligible {
            writeln!(temp, "chrUn_gl{:06}\t0\t{}", k, 100 + k).unwrap();
        }
        temp.flush().unwrap();

        let mut engine = AmbigEngine::for_features(false);
        let store = ingest(&temp, &mut engine);

        prop_assert_eq!(store.lines(), intervals.len() as u64 + negligible);
        prop_assert_eq!(
            engine.negligible_count(store.lines(), store.total() as u64),
            negligible
        );
    }

    /// Single-chromosome ingestion of a block-sorted file matches the
    /// corresponding slice of the whole-file ingestion.
    #[test]
    fn prop_single_scope_matches_whole_file_slice(
        a in arb_intervals(),
        b in arb_intervals(),
        c in arb_intervals(),
    ) {
        let blocks = vec![
            ("chr2".to_string(), a),
            ("chr5".to_string(), b),
            ("chrX".to_string(), c),
        ];
        let temp = write_bed(&blocks);

        let mut whole_engine = AmbigEngine::for_features(false);
        let whole = ingest(&temp, &mut whole_engine);

        let id = ChromId::from_name("chr5");
        let mut single_engine = AmbigEngine::for_features(false);
        let mut reader = BedReader::open(temp.path()).unwrap();
        let single = FeatureStore::load(
            &mut reader,
            ChromScope::Single(id),
            None,
            None,
            &mut single_engine,
        )
        .unwrap();

        prop_assert_eq!(regions(&whole, id), regions(&single, id));
        prop_assert_eq!(single.treated_chrom(), Some(id));
    }

    /// Features ending past the known chromosome length are dropped and
    /// counted; everything else is untouched.
    #[test]
    fn prop_exceeding_length_dropped(intervals in arb_intervals()) {
        let mut sorted = intervals.clone();
        sorted.sort();
        let chrom_len = 50_000u64;
        let exceeding = sorted.iter().filter(|(_, end)| *end > chrom_len).count() as u64;
        prop_assume!(sorted.iter().any(|(_, end)| *end <= chrom_len));

        let mut sizes = ChromSizes::new();
        sizes.insert(ChromId::from_name("chr1"), chrom_len);
        let temp = write_bed(&[("chr1".to_string(), sorted)]);
        let mut reader = BedReader::open(temp.path()).unwrap();
        let mut engine = AmbigEngine::for_features(false);
        let store = FeatureStore::load(
            &mut reader,
            ChromScope::All,
            Some(&sizes),
            None,
            &mut engine,
        )
        .unwrap();

        prop_assert_eq!(engine.count(AmbigCase::ExceedsChromLen), exceeding);
        for rgn in regions(&store, ChromId::from_name("chr1")) {
            prop_assert!(rgn.end <= chrom_len);
        }
    }

    /// Repeating the last record changes nothing: the duplicate is either
    /// an exact duplicate of, or contained in, the last accepted feature,
    /// and both default to omission.
    #[test]
    fn prop_trailing_duplicate_changes_nothing(intervals in arb_intervals()) {
        let mut sorted = intervals.clone();
        sorted.sort();
        let mut with_dup = sorted.clone();
        with_dup.push(*sorted.last().unwrap());

        let id = ChromId::from_name("chr3");
        let mut engine_a = AmbigEngine::for_features(false);
        let plain = ingest(&write_bed(&[("chr3".to_string(), sorted)]), &mut engine_a);
        let mut engine_b = AmbigEngine::for_features(false);
        let dupped = ingest(&write_bed(&[("chr3".to_string(), with_dup)]), &mut engine_b);

        prop_assert_eq!(regions(&plain, id), regions(&dupped, id));
        prop_assert!(engine_b.ambig_total() > engine_a.ambig_total());
    }
}

#[test]
fn single_absent_chromosome_is_fatal() {
    let temp = write_bed(&[("chr1".to_string(), vec![(100, 200)])]);
    let mut reader = BedReader::open(temp.path()).unwrap();
    let mut engine = AmbigEngine::for_features(false);
    let result = FeatureStore::load(
        &mut reader,
        ChromScope::Single(ChromId::from_name("chr7")),
        None,
        None,
        &mut engine,
    );
    assert!(result.is_err());
}

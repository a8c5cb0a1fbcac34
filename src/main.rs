//! bedsift CLI entry point
//!
//! Ingests BED feature and read lists, resolves ambiguities per the
//! configured policy and prints per-file statistics.

use anyhow::Context;
use bedsift::core::{
    Action, AmbigCase, AmbigEngine, ChromId, ChromScope, ChromSizes, FeatureStore, ReadStore,
};
use bedsift::formats::BedReader;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

/// Policy action for an ambiguity case (CLI enum)
#[derive(Clone, Copy, Debug, ValueEnum)]
enum ActionArg {
    /// Keep the record as-is
    #[value(name = "accept")]
    Accept,
    /// Merge into the previous item, with an alarm
    #[value(name = "handle")]
    Handle,
    /// Drop the record, with an alarm
    #[value(name = "omit")]
    Omit,
    /// Drop the record silently
    #[value(name = "silent")]
    Silent,
    /// Fail the whole run
    #[value(name = "abort")]
    Abort,
}

impl From<ActionArg> for Action {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Accept => Action::Accept,
            ActionArg::Handle => Action::Handle,
            ActionArg::Omit => Action::Omit,
            ActionArg::Silent => Action::OmitSilent,
            ActionArg::Abort => Action::Abort,
        }
    }
}

#[derive(Parser)]
#[command(name = "bedsift")]
#[command(about = "Ingestion and cleanup of genomic interval lists")]
#[command(version)]
struct Cli {
    /// Print an alarm to stderr for every handled or omitted record
    #[arg(long, global = true)]
    alarm: bool,

    /// chrom.sizes file for length validation and extension clamping
    #[arg(long = "sizes", global = true)]
    sizes: Option<PathBuf>,

    /// Restrict treatment to a single chromosome (e.g. chr7, X)
    #[arg(long = "chrom", global = true)]
    chrom: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a feature list (peaks, enriched regions)
    Features {
        /// Input BED file (.gz/.bz2 accepted)
        input: PathBuf,
        /// Extend every accepted feature by this many bases on both sides
        #[arg(short = 'e', long = "extend", default_value = "0")]
        extend: i64,
        /// Drop features shorter than this
        #[arg(long = "min-len")]
        min_len: Option<u64>,
        /// Normalize scores to [0, 1] before reporting
        #[arg(long = "scale-scores")]
        scale_scores: bool,
        /// Policy for duplicated features
        #[arg(long = "duplicates", default_value = "omit")]
        duplicates: ActionArg,
        /// Policy for crossed and adjacent features
        #[arg(long = "overlaps", default_value = "handle")]
        overlaps: ActionArg,
    },
    /// Ingest a read-position list
    Reads {
        /// Input BED file (.gz/.bz2 accepted)
        input: PathBuf,
        /// Drop reads scoring at or below this
        #[arg(long = "min-score")]
        min_score: Option<f32>,
        /// Keep duplicate reads instead of dropping them silently
        #[arg(long = "accept-duplicates")]
        accept_duplicates: bool,
    },
    /// Ingest two feature lists and cross-reference their chromosomes
    Common {
        /// First input BED file
        first: PathBuf,
        /// Second input BED file
        second: PathBuf,
    },
}

fn parse_scope(chrom: Option<&str>) -> anyhow::Result<ChromScope> {
    match chrom {
        None => Ok(ChromScope::All),
        Some(name) => {
            let id = ChromId::from_name(name);
            if id.is_negligible() {
                anyhow::bail!("unrecognized chromosome name '{}'", name);
            }
            Ok(ChromScope::Single(id))
        }
    }
}

fn load_sizes(path: Option<&PathBuf>) -> anyhow::Result<Option<ChromSizes>> {
    match path {
        None => Ok(None),
        Some(path) => {
            let sizes = ChromSizes::from_file(path)
                .with_context(|| format!("failed to load chrom.sizes: {:?}", path))?;
            eprintln!(
                "Loaded {} chromosome lengths ({} bp)",
                sizes.len(),
                sizes.genome_size()
            );
            Ok(Some(sizes))
        }
    }
}

fn load_features(
    input: &PathBuf,
    scope: ChromScope,
    sizes: Option<&ChromSizes>,
    min_len: Option<u64>,
    engine: &mut AmbigEngine,
) -> anyhow::Result<FeatureStore> {
    let mut reader =
        BedReader::open(input).with_context(|| format!("failed to open {:?}", input))?;
    let store = FeatureStore::load(&mut reader, scope, sizes, min_len, engine)?;
    Ok(store)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    let scope = parse_scope(cli.chrom.as_deref())?;
    let sizes = load_sizes(cli.sizes.as_ref())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Features {
            input,
            extend,
            min_len,
            scale_scores,
            duplicates,
            overlaps,
        } => {
            let mut engine = AmbigEngine::for_features(cli.alarm)
                .with_action(AmbigCase::Duplicate, duplicates.into())
                .with_action(AmbigCase::Crossed, overlaps.into())
                .with_action(AmbigCase::Adjacent, overlaps.into());

            eprintln!("Ingesting features: {:?}", input);
            let mut store = load_features(&input, scope, sizes.as_ref(), min_len, &mut engine)?;

            writeln!(out, "{}", store.file_name())?;
            engine.report(&mut out, scope, None, store.lines(), store.total() as u64)?;

            if store.uniform_length() && store.total() > 1 {
                log::warn!(
                    "{}: features have uniform length; looks like a read list",
                    store.file_name()
                );
            }
            if scale_scores {
                store.scale_scores();
            }
            if extend != 0 {
                let before = store.total() as u64;
                let mut ext_engine = AmbigEngine::for_features(cli.alarm)
                    .with_action(AmbigCase::Crossed, overlaps.into())
                    .with_action(AmbigCase::Adjacent, overlaps.into());
                store.extend(extend, sizes.as_ref(), &mut ext_engine)?;
                ext_engine.report(
                    &mut out,
                    scope,
                    Some("after extension"),
                    before,
                    store.total() as u64,
                )?;
            }
            eprintln!("Done in {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Reads {
            input,
            min_score,
            accept_duplicates,
        } => {
            let mut engine = AmbigEngine::for_reads(cli.alarm, accept_duplicates);

            eprintln!("Ingesting reads: {:?}", input);
            let mut reader =
                BedReader::open(&input).with_context(|| format!("failed to open {:?}", input))?;
            let store = ReadStore::load(&mut reader, scope, sizes.as_ref(), min_score, &mut engine)?;

            writeln!(out, "{}", store.file_name())?;
            engine.report(&mut out, scope, None, store.lines(), store.total() as u64)?;
            writeln!(out, "  read length: {}", store.read_len())?;
            if store.max_score() > 0.0 {
                writeln!(out, "  max score: {}", store.max_score())?;
            }
            eprintln!("Done in {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Common { first, second } => {
            eprintln!("Ingesting features: {:?}, {:?}", first, second);
            let mut engine_a = AmbigEngine::for_features(cli.alarm);
            let mut engine_b = AmbigEngine::for_features(cli.alarm);
            let sizes_ref = sizes.as_ref();
            let (res_a, res_b) = rayon::join(
                || load_features(&first, scope, sizes_ref, None, &mut engine_a),
                || load_features(&second, scope, sizes_ref, None, &mut engine_b),
            );
            let mut store_a = res_a?;
            let mut store_b = res_b?;

            let common = store_a.index_mut().cross_reference(store_b.index_mut())?;

            writeln!(out, "{}", store_a.file_name())?;
            engine_a.report(&mut out, scope, None, store_a.lines(), store_a.total() as u64)?;
            writeln!(out, "{}", store_b.file_name())?;
            engine_b.report(&mut out, scope, None, store_b.lines(), store_b.total() as u64)?;
            writeln!(out, "  common chromosomes: {}", common)?;
            for id in store_a.index().treated_ids() {
                writeln!(
                    out,
                    "    {}: {} vs {} features",
                    id,
                    store_a.features(id).map_or(0, |f| f.len()),
                    store_b.features(id).map_or(0, |f| f.len())
                )?;
            }
            eprintln!("Done in {:.2}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}

//! bedsift - Ingestion and cleanup of genomic interval lists
//!
//! Reads BED feature lists and read-position lists into per-chromosome
//! stores, resolving every ambiguity (duplicates, overlaps, adjacencies,
//! containment, size drift, score cutoffs, out-of-range positions) through
//! a configurable policy engine.
//!
//! # Features
//!
//! - Zero-copy BED parsing over reused line buffers
//! - Transparent gzip/bzip2 decompression, mmap for large plain files
//! - Single-chromosome or whole-file ingestion scope
//! - Sort-and-recheck pass for inputs unsorted within a chromosome
//! - Post-hoc extension sweep merging the overlaps it creates
//!
//! # Example
//!
//! ```ignore
//! use bedsift::{AmbigEngine, BedReader, ChromScope, FeatureStore};
//!
//! let mut reader = BedReader::open("peaks.bed")?;
//! let mut engine = AmbigEngine::for_features(true);
//! let store = FeatureStore::load(&mut reader, ChromScope::All, None, None, &mut engine)?;
//!
//! for id in store.index().sorted_ids() {
//!     let features = store.features(id).unwrap();
//!     println!("{}: {} features", id, features.len());
//! }
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use crate::core::{
    Action, AmbigCase, AmbigEngine, BedsiftError, ChromId, ChromIndex, ChromScope, ChromSizes,
    Decision, EntityKind, FeatureItem, FeatureStore, ReadItem, ReadStore, Record, RecordSource,
    Region, Result,
};
pub use formats::{bed, BedReader};

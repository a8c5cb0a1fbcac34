//! Core ingestion and resolution functionality
//!
//! This module contains the chromosome model, the ambiguity policy
//! engine, the per-chromosome stores and the extension sweep.

mod ambig;
mod chrom;
mod error;
mod extend;
mod index;
mod ingest;
pub mod io;
mod items;

pub use ambig::{Action, AlarmSink, AmbigCase, AmbigEngine, Decision, EntityKind, StderrAlarm};
pub use chrom::{ChromId, ChromScope, ChromSizes, AUTOSOMES};
pub use error::{BedsiftError, LineContext, Result};
pub use index::{ChromIndex, ChromRange};
pub use ingest::{FeatureStore, ReadStore, Record, RecordSource};
pub use io::{
    detect_compression, ByteLineIterator, Compression, TextReader, DEFAULT_BUFFER_SIZE,
    LARGE_BUFFER_SIZE, MMAP_THRESHOLD,
};
pub use items::{FeatureItem, FeatureState, ItemKind, ReadItem, ReadState, Region};

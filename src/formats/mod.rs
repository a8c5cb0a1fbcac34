//! File format adapters
//!
//! Adapters turning genomic file formats into record streams for the
//! ingestion core. BED covers both feature lists and read-position lists.

pub mod bed;

pub use bed::{BedReader, BedView};

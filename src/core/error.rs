//! Error types for bedsift
//!
//! Per-record ambiguity outcomes are values (`Decision`), never errors;
//! everything in here is fatal for the file being ingested.

use std::fmt;
use thiserror::Error;

/// Physical file/line position of the record currently being processed.
///
/// Borrowed while a record is live; converted to an owned string only when
/// an error or alarm actually fires.
#[derive(Debug, Clone, Copy)]
pub struct LineContext<'a> {
    /// Display name of the input file
    pub file: &'a str,
    /// 1-based line number, 0 when the position is file-level
    pub line: u64,
}

impl fmt::Display for LineContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.file)
        } else {
            write!(f, "{}:{}", self.file, self.line)
        }
    }
}

impl LineContext<'_> {
    pub fn owned(&self) -> String {
        self.to_string()
    }
}

/// Main error type for bedsift operations
#[derive(Debug, Error)]
pub enum BedsiftError {
    /// Start or end field parsed to a negative position
    #[error("{context}: negative start or end position")]
    NegativePosition { context: String },

    /// Start not strictly less than end
    #[error("{context}: start {start} is not less than end {end}")]
    InvalidRegion {
        context: String,
        start: i64,
        end: i64,
    },

    /// Malformed input line (missing fields, unparsable number)
    #[error("{context}: {message}")]
    Malformed { context: String, message: String },

    /// An ambiguity case configured as Abort fired
    #[error("{context}: {message}; execution aborted")]
    Aborted { context: String, message: String },

    /// Out-of-order chromosome blocks while a single chromosome is stated
    #[error("{file}: unsorted chromosome blocks; stating a single chromosome is forbidden")]
    UnsortedSingleChrom { file: String },

    /// Ingestion finished without a single accepted item for the scope
    #[error("{file}: no {entity}{scope}")]
    NoItems {
        file: String,
        entity: &'static str,
        scope: String,
    },

    /// Cross-reference of two chromosome indexes found no shared id
    #[error("no common chromosomes")]
    NoCommonChromosomes,

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for bedsift operations
pub type Result<T> = std::result::Result<T, BedsiftError>;

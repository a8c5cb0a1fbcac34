//! Chromosome naming, identity and sizes
//!
//! Chromosome names are mapped to small ordered ids so stores can key on a
//! byte instead of a string: autosomes 1..22 get ids 0..21, then X, Y and
//! the mitochondrial chromosome. Everything else (scaffolds, `_random`
//! contigs, unplaced sequence) resolves to the negligible sentinel and is
//! dropped during ingestion.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str;

use super::error::{BedsiftError, Result};
use super::io::{ByteLineIterator, TextReader};

/// Number of human autosomes
pub const AUTOSOMES: u8 = 22;

/// Ordered chromosome identifier. Ordering follows the numeric id, so a
/// sorted traversal visits 1..22, X, Y, M.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChromId(u8);

impl ChromId {
    pub const X: ChromId = ChromId(AUTOSOMES);
    pub const Y: ChromId = ChromId(AUTOSOMES + 1);
    pub const M: ChromId = ChromId(AUTOSOMES + 2);
    /// Sentinel for unrecognized (negligible) chromosome names
    pub const UNDEFINED: ChromId = ChromId(u8::MAX);

    /// Resolve a chromosome name. A leading `chr` prefix is stripped
    /// case-insensitively; names that do not reduce to an autosome number,
    /// X, Y or M(T) are negligible.
    pub fn from_name(name: &str) -> ChromId {
        let bare = strip_prefix(name);
        match bare {
            "X" | "x" => return ChromId::X,
            "Y" | "y" => return ChromId::Y,
            "M" | "m" | "MT" | "Mt" | "mt" => return ChromId::M,
            _ => {}
        }
        match bare.parse::<u8>() {
            Ok(n) if n >= 1 && n <= AUTOSOMES => ChromId(n - 1),
            _ => ChromId::UNDEFINED,
        }
    }

    pub fn is_negligible(self) -> bool {
        self == ChromId::UNDEFINED
    }

    /// Short name without the `chr` prefix
    pub fn short_name(self) -> String {
        match self {
            ChromId::X => "X".to_string(),
            ChromId::Y => "Y".to_string(),
            ChromId::M => "M".to_string(),
            ChromId::UNDEFINED => "?".to_string(),
            ChromId(n) => (n + 1).to_string(),
        }
    }
}

impl fmt::Display for ChromId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chr{}", self.short_name())
    }
}

fn strip_prefix(name: &str) -> &str {
    if name.len() >= 3 && name[..3].eq_ignore_ascii_case("chr") {
        &name[3..]
    } else {
        name
    }
}

/// Treatment scope: either every recognized chromosome in the file, or a
/// single stated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromScope {
    All,
    Single(ChromId),
}

impl ChromScope {
    pub fn is_all(self) -> bool {
        matches!(self, ChromScope::All)
    }

    pub fn stated(self) -> Option<ChromId> {
        match self {
            ChromScope::All => None,
            ChromScope::Single(id) => Some(id),
        }
    }
}

impl fmt::Display for ChromScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChromScope::All => write!(f, "all chromosomes"),
            ChromScope::Single(id) => write!(f, "{}", id),
        }
    }
}

/// Chromosome lengths loaded from a two-column `chrom.sizes` file.
///
/// Records on chromosomes without a known length skip the
/// length-exceeded check rather than failing.
#[derive(Debug, Default, Clone)]
pub struct ChromSizes {
    sizes: HashMap<ChromId, u64>,
}

impl ChromSizes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a UCSC-style chrom.sizes file: `<name>\t<length>` per line.
    /// Unrecognized chromosome names are skipped.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path.display().to_string();
        let (reader, _, _) = TextReader::open(path)?;
        let mut lines = ByteLineIterator::new(reader);
        let mut sizes = HashMap::new();
        let mut line_no: u64 = 0;

        while let Some(line) = lines.next_line() {
            let line = line?;
            line_no += 1;
            if line.is_empty() || line[0] == b'#' {
                continue;
            }
            let tab = memchr::memchr2(b'\t', b' ', line).ok_or_else(|| {
                BedsiftError::Malformed {
                    context: format!("{}:{}", file_name, line_no),
                    message: "expected <name> <length>".to_string(),
                }
            })?;
            let name = str::from_utf8(&line[..tab]).map_err(|_| BedsiftError::Malformed {
                context: format!("{}:{}", file_name, line_no),
                message: "non-UTF8 chromosome name".to_string(),
            })?;
            let id = ChromId::from_name(name);
            if id.is_negligible() {
                continue;
            }
            let len_field = str::from_utf8(&line[tab + 1..])
                .ok()
                .map(str::trim)
                .and_then(|s| s.parse::<u64>().ok())
                .ok_or_else(|| BedsiftError::Malformed {
                    context: format!("{}:{}", file_name, line_no),
                    message: "unparsable chromosome length".to_string(),
                })?;
            sizes.insert(id, len_field);
        }
        Ok(Self { sizes })
    }

    pub fn insert(&mut self, id: ChromId, len: u64) {
        self.sizes.insert(id, len);
    }

    /// Length of a chromosome, or None when unknown
    pub fn get(&self, id: ChromId) -> Option<u64> {
        self.sizes.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Total length of all known chromosomes
    pub fn genome_size(&self) -> u64 {
        self.sizes.values().sum()
    }
}

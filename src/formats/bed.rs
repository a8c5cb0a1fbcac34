//! BED format adapter
//!
//! Zero-copy field splitting over reused line buffers. Only the three
//! coordinate fields are parsed eagerly; the score (column 5) and anything
//! after it are looked at lazily. Header, `track`, `browser` and comment
//! lines are skipped here and never reach ingestion, but physical line
//! numbers are preserved for diagnostics.

use crate::core::io::{ByteLineIterator, Compression, TextReader};
use crate::core::{BedsiftError, Record, RecordSource, Result};
use memchr::memchr;
use std::path::Path;
use std::str;

/// Zero-copy BED line view. Start and end stay signed so that negative
/// coordinates survive parsing and fail validation, not tokenization.
pub struct BedView<'a> {
    line: &'a [u8],
    pub chrom: &'a str,
    pub start: i64,
    pub end: i64,
    field_bounds: Vec<(usize, usize)>,
}

impl<'a> BedView<'a> {
    /// Split a data line on tabs and parse the coordinate fields
    pub fn parse(line: &'a [u8]) -> std::result::Result<Self, String> {
        let mut field_bounds = Vec::with_capacity(6);
        let mut start_pos = 0;
        while start_pos <= line.len() {
            match memchr(b'\t', &line[start_pos..]) {
                Some(tab) => {
                    field_bounds.push((start_pos, start_pos + tab));
                    start_pos += tab + 1;
                }
                None => {
                    field_bounds.push((start_pos, line.len()));
                    break;
                }
            }
        }
        if field_bounds.len() < 3 {
            return Err(format!(
                "expected at least 3 fields, found {}",
                field_bounds.len()
            ));
        }

        let chrom = str::from_utf8(&line[field_bounds[0].0..field_bounds[0].1])
            .map_err(|_| "non-UTF8 chromosome name".to_string())?;
        let start = parse_coord(line, field_bounds[1], "start")?;
        let end = parse_coord(line, field_bounds[2], "end")?;

        Ok(Self {
            line,
            chrom,
            start,
            end,
            field_bounds,
        })
    }

    pub fn field_count(&self) -> usize {
        self.field_bounds.len()
    }

    /// Field as string slice (lazy access)
    pub fn field(&self, index: usize) -> Option<&'a str> {
        self.field_bounds
            .get(index)
            .and_then(|(start, end)| str::from_utf8(&self.line[*start..*end]).ok())
    }

    /// Score from column 5, when present and numeric. A `.` placeholder
    /// counts as absent.
    pub fn score(&self) -> Option<f32> {
        self.field(4).and_then(|s| s.parse().ok())
    }
}

fn parse_coord(
    line: &[u8],
    (from, to): (usize, usize),
    what: &str,
) -> std::result::Result<i64, String> {
    str::from_utf8(&line[from..to])
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            format!(
                "unparsable {} field '{}'",
                what,
                String::from_utf8_lossy(&line[from..to])
            )
        })
}

/// Lines that carry no data: blanks, comments, track/browser headers
fn is_data_line(line: &[u8]) -> bool {
    !(line.is_empty()
        || line[0] == b'#'
        || line.starts_with(b"track")
        || line.starts_with(b"browser"))
}

/// Streaming record source over a (possibly compressed) BED file
pub struct BedReader {
    lines: ByteLineIterator<TextReader>,
    file: String,
    line_no: u64,
    curr_line: u64,
    estimated: usize,
    /// First data line, read ahead by open() for the size estimate
    pending: Option<Vec<u8>>,
    pending_line_no: u64,
    line_buf: Vec<u8>,
}

impl BedReader {
    /// Open a BED file, detecting gzip/bzip2 transparently. The record
    /// count estimate comes from the file size over the first data line's
    /// length.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = path.display().to_string();
        let (reader, size, compression) = TextReader::open(path)?;
        let mut lines = ByteLineIterator::new(reader);

        let mut pending = None;
        let mut line_no: u64 = 0;
        let mut pending_line_no: u64 = 0;
        while let Some(line) = lines.next_line() {
            let line = line?;
            line_no += 1;
            if is_data_line(line) {
                pending_line_no = line_no;
                pending = Some(line.to_vec());
                break;
            }
        }

        let estimated = match &pending {
            Some(line) if size > 0 => {
                let per_line = (line.len() + 1) as u64;
                // compressed text is taken at a nominal 3x ratio
                let bytes = match compression {
                    Compression::None => size,
                    _ => size * 3,
                };
                (bytes / per_line) as usize
            }
            _ => 0,
        };

        Ok(Self {
            lines,
            file,
            line_no,
            curr_line: 0,
            estimated,
            pending,
            pending_line_no,
            line_buf: Vec::new(),
        })
    }

    /// Pull the next data line into the scratch buffer. False at EOF.
    fn fill_line(&mut self) -> Result<bool> {
        if let Some(pending) = self.pending.take() {
            self.line_buf = pending;
            self.curr_line = self.pending_line_no;
            return Ok(true);
        }
        loop {
            match self.lines.next_line() {
                None => return Ok(false),
                Some(line) => {
                    let line = line?;
                    self.line_no += 1;
                    if is_data_line(line) {
                        self.line_buf.clear();
                        self.line_buf.extend_from_slice(line);
                        self.curr_line = self.line_no;
                        return Ok(true);
                    }
                }
            }
        }
    }
}

impl RecordSource for BedReader {
    fn file_name(&self) -> &str {
        &self.file
    }

    fn estimated_records(&self) -> usize {
        self.estimated
    }

    fn next_record(&mut self) -> Result<Option<Record<'_>>> {
        if !self.fill_line()? {
            return Ok(None);
        }
        let view = BedView::parse(&self.line_buf).map_err(|message| BedsiftError::Malformed {
            context: format!("{}:{}", self.file, self.curr_line),
            message,
        })?;
        Ok(Some(Record {
            chrom: view.chrom,
            start: view.start,
            end: view.end,
            score: view.score(),
            line: self.curr_line,
        }))
    }
}

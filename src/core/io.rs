//! Buffered and memory-mapped input with transparent decompression
//!
//! BED inputs range from a few kilobytes to multi-gigabyte alignment dumps,
//! so plain files pick between a BufReader and an mmap by size, while
//! gzip/bzip2 inputs always stream through a decoder.

use bzip2::read::BzDecoder;
use flate2::read::MultiGzDecoder;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Default buffer size for BufReader (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Large buffer size for high-throughput I/O (1MB)
pub const LARGE_BUFFER_SIZE: usize = 1024 * 1024;

/// Threshold for using memory mapping (100MB)
pub const MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;

/// Compression format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
}

/// Detect compression from the file extension, falling back to magic bytes.
pub fn detect_compression(path: &Path) -> io::Result<Compression> {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        match ext.to_ascii_lowercase().as_str() {
            "gz" | "bgz" => return Ok(Compression::Gzip),
            "bz2" => return Ok(Compression::Bzip2),
            _ => {}
        }
    }
    let mut file = File::open(path)?;
    let mut magic = [0u8; 3];
    let n = file.read(&mut magic)?;
    if n >= 2 && magic[0] == 0x1f && magic[1] == 0x8b {
        Ok(Compression::Gzip)
    } else if n >= 3 && &magic == b"BZh" {
        Ok(Compression::Bzip2)
    } else {
        Ok(Compression::None)
    }
}

/// A reader over decoded text that picks its strategy from the file:
/// decoder stream for compressed inputs, mmap for large plain files,
/// BufReader otherwise.
pub enum TextReader {
    Buffered(BufReader<File>),
    Mapped(MappedReader),
    Gzip(BufReader<MultiGzDecoder<BufReader<File>>>),
    Bzip2(BufReader<BzDecoder<BufReader<File>>>),
}

/// Memory-mapped file reader
pub struct MappedReader {
    mmap: Mmap,
    position: usize,
}

impl MappedReader {
    pub fn new(file: &File) -> io::Result<Self> {
        // SAFETY: We assume the file won't be modified while mapped
        let mmap = unsafe { Mmap::map(file)? };
        Ok(Self { mmap, position: 0 })
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }
}

impl Read for MappedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.mmap[self.position..];
        let to_read = std::cmp::min(buf.len(), remaining.len());
        buf[..to_read].copy_from_slice(&remaining[..to_read]);
        self.position += to_read;
        Ok(to_read)
    }
}

impl BufRead for MappedReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(&self.mmap[self.position..])
    }

    fn consume(&mut self, amt: usize) {
        self.position = std::cmp::min(self.position + amt, self.mmap.len());
    }
}

impl TextReader {
    /// Open a file, returning the reader together with its on-disk size
    /// and detected compression.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<(Self, u64, Compression)> {
        let path = path.as_ref();
        let compression = detect_compression(path)?;
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();

        let reader = match compression {
            Compression::Gzip => {
                let inner = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
                TextReader::Gzip(BufReader::with_capacity(
                    DEFAULT_BUFFER_SIZE,
                    MultiGzDecoder::new(inner),
                ))
            }
            Compression::Bzip2 => {
                let inner = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
                TextReader::Bzip2(BufReader::with_capacity(
                    DEFAULT_BUFFER_SIZE,
                    BzDecoder::new(inner),
                ))
            }
            Compression::None => {
                if file_size >= MMAP_THRESHOLD {
                    TextReader::Mapped(MappedReader::new(&file)?)
                } else {
                    let buf_size = if file_size > 10 * 1024 * 1024 {
                        LARGE_BUFFER_SIZE
                    } else {
                        DEFAULT_BUFFER_SIZE
                    };
                    TextReader::Buffered(BufReader::with_capacity(buf_size, file))
                }
            }
        };
        Ok((reader, file_size, compression))
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, TextReader::Mapped(_))
    }
}

impl Read for TextReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            TextReader::Buffered(r) => r.read(buf),
            TextReader::Mapped(r) => r.read(buf),
            TextReader::Gzip(r) => r.read(buf),
            TextReader::Bzip2(r) => r.read(buf),
        }
    }
}

impl BufRead for TextReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            TextReader::Buffered(r) => r.fill_buf(),
            TextReader::Mapped(r) => r.fill_buf(),
            TextReader::Gzip(r) => r.fill_buf(),
            TextReader::Bzip2(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            TextReader::Buffered(r) => r.consume(amt),
            TextReader::Mapped(r) => r.consume(amt),
            TextReader::Gzip(r) => r.consume(amt),
            TextReader::Bzip2(r) => r.consume(amt),
        }
    }
}

/// Byte line iterator that reuses a buffer to avoid allocations
pub struct ByteLineIterator<R: BufRead> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R: BufRead> ByteLineIterator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(4096),
        }
    }

    /// Read the next line as bytes, without the trailing (CR)LF.
    /// Returns None at EOF.
    pub fn next_line(&mut self) -> Option<io::Result<&[u8]>> {
        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                if self.buffer.last() == Some(&b'\n') {
                    self.buffer.pop();
                    if self.buffer.last() == Some(&b'\r') {
                        self.buffer.pop();
                    }
                }
                Some(Ok(&self.buffer))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

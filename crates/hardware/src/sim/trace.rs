//! Memory trace ingestion.
//!
//! Traces are text, one record per line:
//!
//! ```text
//! <seq>: <tid>, <is_bundle>, <is_write>, <size>, <hex address>, <pc>
//! ```
//!
//! Only reads (an `is_write` field of exactly `0`) are replayed; writes and
//! records whose `is_write` field is not a single character are skipped. A
//! read larger than one chunk is split into line-sized pieces: the record's
//! own address, then further addresses one chunk apart while bytes remain.

use std::io::{BufRead, Lines};

use crate::common::addr::Addr;
use crate::common::error::TraceError;

/// Minimum number of separated fields in a record.
const RECORD_FIELDS: usize = 6;

/// A decoded read record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadRecord {
    /// Address of the first byte read.
    pub addr: Addr,
    /// Bytes read.
    pub size: u64,
}

impl ReadRecord {
    /// Splits the read into addresses `chunk_bytes` apart.
    ///
    /// The first address is always the record's own; one more follows for
    /// every further (possibly partial) chunk. A zero `chunk_bytes` yields
    /// only the record's address.
    pub fn chunks(&self, chunk_bytes: u64) -> Chunks {
        let extra = if chunk_bytes == 0 {
            0
        } else {
            self.size.saturating_sub(chunk_bytes).div_ceil(chunk_bytes)
        };
        Chunks {
            next: self.addr,
            remaining: extra + 1,
            step: chunk_bytes,
        }
    }
}

/// Iterator over the chunk addresses of one read.
#[derive(Clone, Debug)]
pub struct Chunks {
    next: Addr,
    remaining: u64,
    step: u64,
}

impl Iterator for Chunks {
    type Item = Addr;

    fn next(&mut self) -> Option<Addr> {
        if self.remaining == 0 {
            return None;
        }
        let addr = self.next;
        self.next = self.next.wrapping_add(self.step);
        self.remaining -= 1;
        Some(addr)
    }
}

/// Parses one trace line.
///
/// # Arguments
///
/// * `line` - The raw line.
/// * `line_no` - 1-based line number, reported in errors.
///
/// # Returns
///
/// `Ok(Some(record))` for a read, `Ok(None)` for blank lines and non-reads.
///
/// # Errors
///
/// Returns [`TraceError::Malformed`] when the line has too few fields, or a
/// read record's flag, size or address cannot be decoded.
pub fn parse_record(line: &str, line_no: usize) -> Result<Option<ReadRecord>, TraceError> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split([':', ',']).map(str::trim).collect();
    let malformed = |reason: String| TraceError::Malformed {
        line: line_no,
        reason,
    };
    if fields.len() < RECORD_FIELDS {
        return Err(malformed(format!(
            "expected {RECORD_FIELDS} fields, found {}",
            fields.len()
        )));
    }

    let is_write = fields[3];
    if is_write.len() != 1 {
        return Ok(None);
    }
    let is_write: u8 = is_write
        .parse()
        .map_err(|_| malformed(format!("invalid write flag `{is_write}`")))?;
    if is_write != 0 {
        return Ok(None);
    }

    let size = fields[4]
        .parse()
        .map_err(|_| malformed(format!("invalid access size `{}`", fields[4])))?;
    let hex = fields[5]
        .strip_prefix("0x")
        .or_else(|| fields[5].strip_prefix("0X"))
        .unwrap_or(fields[5]);
    let addr = Addr::from_str_radix(hex, 16)
        .map_err(|_| malformed(format!("invalid address `{}`", fields[5])))?;

    Ok(Some(ReadRecord { addr, size }))
}

/// Streaming reader producing the chunked read addresses of a trace.
#[derive(Debug)]
pub struct TraceReader<R> {
    lines: Lines<R>,
    line_no: usize,
    chunk_bytes: u64,
    pending: Option<Chunks>,
}

impl<R: BufRead> TraceReader<R> {
    /// Creates a reader over `input`.
    ///
    /// # Arguments
    ///
    /// * `input` - Buffered trace text.
    /// * `chunk_bytes` - Chunk size, normally the line size in bytes of the first level.
    pub fn new(input: R, chunk_bytes: u64) -> Self {
        Self {
            lines: input.lines(),
            line_no: 0,
            chunk_bytes,
            pending: None,
        }
    }

    /// Lines consumed so far.
    pub const fn lines_read(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<Addr, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(addr) = self.pending.as_mut().and_then(Iterator::next) {
                return Some(Ok(addr));
            }
            self.pending = None;

            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            self.line_no += 1;

            match parse_record(&line, self.line_no) {
                Ok(Some(record)) => self.pending = Some(record.chunks(self.chunk_bytes)),
                Ok(None) => {}
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

/// Reads a whole trace into memory.
///
/// # Errors
///
/// Returns the first [`TraceError`] encountered.
pub fn read_addresses<R: BufRead>(input: R, chunk_bytes: u64) -> Result<Vec<Addr>, TraceError> {
    TraceReader::new(input, chunk_bytes).collect()
}

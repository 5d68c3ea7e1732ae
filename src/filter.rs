use std::collections::VecDeque;
use std::io::Read;

use memchr::memmem;
use rustc_hash::FxHashSet;

use crate::scanner::{LineScanner, Scanned, DEFAULT_MAX_RECORD_LEN};

/// Delimiter re-emitted after every kept record
const DELIMITER: u8 = b'\n';

/// Reusable line predicates for set- and substring-based filtering
///
/// Callers with a plain closure can pass it to [`FilterReader`] directly;
/// this enum covers the common cases of filtering by exact-line sets or by
/// substring.
#[derive(Debug, Clone, Copy)]
pub enum FilterMode<'a> {
    /// Keep every record
    Passthrough,
    /// Keep only records listed in the set
    Allow(&'a FxHashSet<Vec<u8>>),
    /// Drop records listed in the set
    Block(&'a FxHashSet<Vec<u8>>),
    /// Keep only records containing the needle
    KeepContaining(&'a [u8]),
    /// Drop records containing the needle
    DropContaining(&'a [u8]),
}

impl FilterMode<'_> {
    /// Decide whether a record survives the filter
    pub fn keeps(&self, record: &[u8]) -> bool {
        match self {
            FilterMode::Passthrough => true,
            FilterMode::Allow(list) => list.contains(record),
            FilterMode::Block(list) => !list.contains(record),
            FilterMode::KeepContaining(needle) => memmem::find(record, needle).is_some(),
            FilterMode::DropContaining(needle) => memmem::find(record, needle).is_none(),
        }
    }
}

/// Byte-oriented pull adapter over the kept records of a byte source
///
/// `read` fills the destination from an internal residual buffer, pulling
/// and filtering one source record at a time until the buffer covers the
/// request or the source ends. Every kept record is re-terminated with a
/// newline, including a final record the source left unterminated; dropped
/// records leave no trace in the output. Reads smaller than the front
/// record return mid-record and the remainder is served by later calls, so
/// the output is identical at any destination buffer size.
///
/// `Ok(0)` is returned exactly when the source is exhausted and the
/// residual buffer is drained. The first error - from the source, or an
/// oversized record - is returned once; afterwards the reader is finished
/// and reads return `Ok(0)`.
pub struct FilterReader<R: Read, F: FnMut(&[u8]) -> bool> {
    scanner: LineScanner<R>,
    keep: F,
    residual: VecDeque<u8>,
    eof: bool,
    finished: bool,
}

impl<R: Read, F: FnMut(&[u8]) -> bool> FilterReader<R, F> {
    /// Build a filter reader with the default record length limit
    ///
    /// `keep` is called exactly once per record with the delimiter-stripped
    /// line bytes. It must be total: a panicking predicate unwinds through
    /// `read`, it is never treated as "drop".
    pub fn new(source: R, keep: F) -> Self {
        Self::with_max_record_len(source, keep, DEFAULT_MAX_RECORD_LEN)
    }

    /// Build a filter reader with a custom record length limit
    pub fn with_max_record_len(source: R, keep: F, max_record_len: usize) -> Self {
        FilterReader {
            scanner: LineScanner::with_max_record_len(source, max_record_len),
            keep,
            residual: VecDeque::new(),
            eof: false,
            finished: false,
        }
    }
}

impl<R: Read, F: FnMut(&[u8]) -> bool> Read for FilterReader<R, F> {
    fn read(&mut self, dst: &mut [u8]) -> std::io::Result<usize> {
        if self.finished {
            return Ok(0);
        }

        // Refill one record at a time until the residual covers the
        // request or the source ends; never drains the source further
        // than the request needs.
        while !self.eof && self.residual.len() < dst.len() {
            match self.scanner.advance() {
                Ok(Scanned::Record(record)) => {
                    if (self.keep)(&record) {
                        self.residual.extend(record);
                        self.residual.push_back(DELIMITER);
                    }
                }
                Ok(Scanned::End) => self.eof = true,
                Err(e) => {
                    self.finished = true;
                    return Err(e);
                }
            }
        }

        // VecDeque's Read impl consumes from the front
        let copied = self.residual.read(dst)?;
        if self.eof && self.residual.is_empty() {
            self.finished = true;
        }
        Ok(copied)
    }
}

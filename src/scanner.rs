use std::io::{BufRead, BufReader, Read};

use memchr::memchr;

/// Default limit on the length of a single record, delimiter excluded
///
/// Records longer than this make [`LineScanner::advance`] fail with an
/// `InvalidData` error rather than silently truncating. Configurable
/// through [`LineScanner::with_max_record_len`].
pub const DEFAULT_MAX_RECORD_LEN: usize = 64 * 1024;

/// One step of the scanner
#[derive(Debug, PartialEq, Eq)]
pub enum Scanned {
    /// The next line, delimiter stripped
    Record(Vec<u8>),
    /// The source is exhausted
    End,
}

/// Streaming line scanner over any byte source
///
/// Yields successive newline-delimited records in source order. A trailing
/// line without a terminating newline is yielded as a final record. The
/// scanner holds at most one record plus its read-ahead buffer in memory.
pub struct LineScanner<R: Read> {
    inner: BufReader<R>,
    max_record_len: usize,
    done: bool,
}

impl<R: Read> LineScanner<R> {
    /// Create a scanner with the default record length limit
    pub fn new(source: R) -> Self {
        Self::with_max_record_len(source, DEFAULT_MAX_RECORD_LEN)
    }

    /// Create a scanner with a custom record length limit
    pub fn with_max_record_len(source: R, max_record_len: usize) -> Self {
        LineScanner {
            inner: BufReader::new(source),
            max_record_len,
            done: false,
        }
    }

    /// Pull the next record from the source
    ///
    /// Returns `Scanned::Record` with the delimiter-stripped line bytes, or
    /// `Scanned::End` once the source is exhausted. Errors from the source
    /// are propagated verbatim; a record longer than the configured limit
    /// produces an `InvalidData` error. After `End` or an error the scanner
    /// stays finished.
    pub fn advance(&mut self) -> std::io::Result<Scanned> {
        if self.done {
            return Ok(Scanned::End);
        }

        let mut record = Vec::new();
        loop {
            let available = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) => {
                    self.done = true;
                    return Err(e);
                }
            };

            if available.is_empty() {
                // Clean EOF; a pending partial line becomes the final record
                self.done = true;
                if record.is_empty() {
                    return Ok(Scanned::End);
                }
                return Ok(Scanned::Record(record));
            }

            match memchr(b'\n', available) {
                Some(pos) => {
                    if record.len() + pos > self.max_record_len {
                        self.done = true;
                        return Err(oversized_record(self.max_record_len));
                    }
                    record.extend_from_slice(&available[..pos]);
                    self.inner.consume(pos + 1);
                    return Ok(Scanned::Record(record));
                }
                None => {
                    // Delimiter not in the buffered window yet; take the
                    // whole window and keep scanning
                    let len = available.len();
                    if record.len() + len > self.max_record_len {
                        self.done = true;
                        return Err(oversized_record(self.max_record_len));
                    }
                    record.extend_from_slice(available);
                    self.inner.consume(len);
                }
            }
        }
    }
}

fn oversized_record(limit: usize) -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!("record exceeds the maximum length of {} bytes", limit),
    )
}

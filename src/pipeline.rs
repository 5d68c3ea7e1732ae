use std::io::{self, Read, Write};
use std::thread;

use flate2::{Compression, GzBuilder};

use crate::digest::{DigestAlgorithm, DigestWriter};
use crate::filter::{FilterMode, FilterReader};

/// Stream the filtered lines of `input` into `output`
///
/// This function:
/// - Reads input one record at a time
/// - Applies `mode` to each delimiter-stripped record
/// - Re-terminates every kept record with a newline
/// - Optionally computes a checksum of the bytes written
///
/// Returns:
/// - `Ok(None)` if no digest algorithm was specified
/// - `Ok(Some(hex_string))` if a digest was computed
pub fn filter_lines_streaming<R: Read, W: Write>(
    input: R,
    output: &mut W,
    mode: FilterMode,
    digest_algorithm: Option<DigestAlgorithm>,
    max_record_len: usize,
) -> io::Result<Option<String>> {
    let mut reader =
        FilterReader::with_max_record_len(input, |record| mode.keeps(record), max_record_len);

    match digest_algorithm {
        Some(algorithm) => {
            let mut digest_writer = DigestWriter::new(output, algorithm);
            io::copy(&mut reader, &mut digest_writer)?;
            Ok(Some(digest_writer.finalize()))
        }
        None => {
            io::copy(&mut reader, output)?;
            Ok(None)
        }
    }
}

/// Stream the filtered lines of `input` into a compressed archive on `output`
///
/// The filtered stream becomes a single gzip member whose header records
/// `entry_name`. The encoder runs on a producer thread and its output is
/// pumped through an OS pipe to `output` on the calling thread, so neither
/// side ever holds the whole stream in memory. If the sink-side pump fails,
/// the pipe is closed to unblock the producer; when both sides fail, the
/// producer's error is returned.
///
/// `entry_name` must not contain a NUL byte. On error the sink may already
/// hold a partial archive.
///
/// Returns the checksum of the bytes written to `output`, as with
/// [`filter_lines_streaming`].
pub fn filter_to_archive<R, W>(
    input: R,
    output: &mut W,
    mode: FilterMode,
    entry_name: &str,
    digest_algorithm: Option<DigestAlgorithm>,
    max_record_len: usize,
) -> io::Result<Option<String>>
where
    R: Read + Send,
    W: Write,
{
    let mut reader =
        FilterReader::with_max_record_len(input, |record| mode.keeps(record), max_record_len);
    let (mut pipe_reader, pipe_writer) = os_pipe::pipe()?;

    thread::scope(|scope| {
        let producer = scope.spawn(move || -> io::Result<()> {
            let mut encoder = GzBuilder::new()
                .filename(entry_name)
                .write(pipe_writer, Compression::default());
            io::copy(&mut reader, &mut encoder)?;
            // finish() flushes the trailer and releases the pipe writer,
            // closing the write end so the pump sees EOF
            encoder.finish()?;
            Ok(())
        });

        let pumped = match digest_algorithm {
            Some(algorithm) => {
                let mut digest_writer = DigestWriter::new(output, algorithm);
                io::copy(&mut pipe_reader, &mut digest_writer)
                    .map(|_| Some(digest_writer.finalize()))
            }
            None => io::copy(&mut pipe_reader, output).map(|_| None),
        };

        // Close the read end before joining: a failed pump would otherwise
        // leave the producer blocked on a pipe nobody drains
        drop(pipe_reader);

        match producer.join() {
            Ok(Ok(())) => pumped,
            Ok(Err(e)) => Err(e),
            Err(panic) => std::panic::resume_unwind(panic),
        }
    })
}

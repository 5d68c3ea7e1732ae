//! line-sieve - Streaming filter for newline-delimited byte streams
//!
//! This library filters newline-delimited byte streams through a
//! caller-supplied predicate and serves the surviving lines through a
//! `std::io::Read` adapter, so the filtered stream can feed anything that
//! consumes a reader - including the built-in compressed archive pipeline.
//!
//! # Key Features
//!
//! - **True streaming**: one record in memory at a time, bounded residual buffer
//! - **Read contract fidelity**: correct at any destination buffer size, `Ok(0)` exactly at end of stream
//! - **Flexible filtering**: closures, exact-line sets (allow/block), or substring rules
//! - **Order preservation**: kept lines appear in exact source order
//! - **Re-delimiting**: every kept line is newline-terminated, even a final unterminated one
//! - **Archive pipeline**: filtered stream into a named gzip entry through an OS pipe
//!
//! # Examples
//!
//! **Filter through a reader**:
//!
//! ```
//! use line_sieve::FilterReader;
//! use std::io::Read;
//!
//! let source: &[u8] = b"1\n2\n3\n";
//! let mut reader = FilterReader::new(source, |line: &[u8]| !line.contains(&b'2'));
//! let mut out = Vec::new();
//! reader.read_to_end(&mut out).unwrap();
//! assert_eq!(out, b"1\n3\n");
//! ```
//!
//! **Keep only allowlisted lines**:
//!
//! ```
//! use line_sieve::{filter_lines_streaming, FilterMode, DEFAULT_MAX_RECORD_LEN};
//! use rustc_hash::FxHashSet;
//!
//! let mut allowlist = FxHashSet::default();
//! allowlist.insert(b"rails".to_vec());
//!
//! let source: &[u8] = b"rails\nsinatra\n";
//! let mut out = Vec::new();
//! filter_lines_streaming(source, &mut out, FilterMode::Allow(&allowlist), None, DEFAULT_MAX_RECORD_LEN).unwrap();
//! assert_eq!(out, b"rails\n");
//! ```
//!
//! **Filter into a named archive entry**:
//!
//! ```
//! use line_sieve::{filter_to_archive, FilterMode, DEFAULT_MAX_RECORD_LEN};
//!
//! let source: &[u8] = b"keep\nskip this\nkeep too\n";
//! let mut archive = Vec::new();
//! filter_to_archive(
//!     source,
//!     &mut archive,
//!     FilterMode::DropContaining(b"skip"),
//!     "records.txt",
//!     None,
//!     DEFAULT_MAX_RECORD_LEN,
//! )
//! .unwrap();
//! ```

pub mod digest;
pub mod filter;
pub mod pipeline;
pub mod scanner;

pub use digest::{DigestAlgorithm, DigestWriter};
pub use filter::{FilterMode, FilterReader};
pub use pipeline::{filter_lines_streaming, filter_to_archive};
pub use scanner::{LineScanner, Scanned, DEFAULT_MAX_RECORD_LEN};

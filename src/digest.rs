use std::io::Write;

use sha2::{Digest, Sha256, Sha512};

/// Supported digest algorithms for checksum computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    /// SHA-256 checksum
    Sha256,
    /// SHA-512 checksum
    Sha512,
}

impl DigestAlgorithm {
    /// Algorithm name for status output
    pub fn name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha512 => "SHA-512",
        }
    }
}

/// Active digest state
enum DigestState {
    Sha256(Sha256),
    Sha512(Sha512),
}

/// Writer wrapper that folds written bytes into a digest as they stream out
///
/// Only bytes the inner writer actually accepted are hashed, so the final
/// checksum always matches the sink's contents.
pub struct DigestWriter<'a, W: Write> {
    inner: &'a mut W,
    state: DigestState,
}

impl<'a, W: Write> DigestWriter<'a, W> {
    /// Create a new DigestWriter with the specified algorithm
    pub fn new(inner: &'a mut W, algorithm: DigestAlgorithm) -> Self {
        let state = match algorithm {
            DigestAlgorithm::Sha256 => DigestState::Sha256(Sha256::new()),
            DigestAlgorithm::Sha512 => DigestState::Sha512(Sha512::new()),
        };
        DigestWriter { inner, state }
    }

    /// Finalize the digest and return the hex-encoded checksum
    pub fn finalize(self) -> String {
        match self.state {
            DigestState::Sha256(hasher) => hex::encode(hasher.finalize()),
            DigestState::Sha512(hasher) => hex::encode(hasher.finalize()),
        }
    }
}

impl<W: Write> Write for DigestWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let written = self.inner.write(buf)?;
        match &mut self.state {
            DigestState::Sha256(hasher) => hasher.update(&buf[..written]),
            DigestState::Sha512(hasher) => hasher.update(&buf[..written]),
        }
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

//! File digests used to detect content changes

use crate::error::{DdlogError, Result};
use blake3::Hasher;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A digest represented as a lowercase hex string
pub type HashValue = String;

/// Block size used when streaming files through the hasher
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Supported digest algorithms; both produce 256-bit digests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum HashAlgorithm {
    #[default]
    Blake3,
    Sha256,
}

impl HashAlgorithm {
    /// Label used in log entries, e.g. "BLAKE3 hash: ..."
    pub fn label(&self) -> &'static str {
        match self {
            Self::Blake3 => "BLAKE3",
            Self::Sha256 => "SHA-256",
        }
    }

    /// Length of the hex digest in characters
    pub fn hex_len(&self) -> usize {
        64
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

enum StreamHasher {
    Blake3(Box<Hasher>),
    Sha256(Sha256),
}

impl StreamHasher {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(Hasher::new())),
            HashAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
        }
    }

    fn update(&mut self, block: &[u8]) {
        match self {
            Self::Blake3(h) => {
                h.update(block);
            }
            Self::Sha256(h) => h.update(block),
        }
    }

    fn finalize(self) -> HashValue {
        match self {
            Self::Blake3(h) => h.finalize().to_hex().to_string(),
            Self::Sha256(h) => format!("{:x}", h.finalize()),
        }
    }
}

/// Compute the digest of a file using the default chunk size
pub fn digest(path: &Path, algorithm: HashAlgorithm) -> Result<HashValue> {
    digest_with_chunk_size(path, algorithm, DEFAULT_CHUNK_SIZE)
}

/// Compute the digest of a file, reading `chunk_size` bytes at a time
pub fn digest_with_chunk_size(
    path: &Path,
    algorithm: HashAlgorithm,
    chunk_size: usize,
) -> Result<HashValue> {
    digest_with_progress(path, algorithm, chunk_size, |_| {})
}

/// Compute the digest of a file, calling `on_progress` with the running
/// byte count after every block
pub fn digest_with_progress<F>(
    path: &Path,
    algorithm: HashAlgorithm,
    chunk_size: usize,
    mut on_progress: F,
) -> Result<HashValue>
where
    F: FnMut(u64),
{
    if chunk_size == 0 {
        return Err(DdlogError::invalid_input("Chunk size must be greater than 0"));
    }

    let mut file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DdlogError::file_not_found(path)
        } else {
            e.into()
        }
    })?;

    let mut hasher = StreamHasher::new(algorithm);
    let mut buffer = vec![0u8; chunk_size];
    let mut total: u64 = 0;

    loop {
        let n = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        hasher.update(&buffer[..n]);
        total += n as u64;
        on_progress(total);
    }

    let hash = hasher.finalize();
    log::debug!("{} {} of {} ({} bytes)", algorithm, hash, path.display(), total);
    Ok(hash)
}

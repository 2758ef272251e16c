use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::read_error;
use crate::{Algorithm, Hasher, Result, VerificationError};

/// Chunk size used when streaming a file through a hasher.
pub const CHUNK_SIZE: usize = 16 * 1024;

/// Streaming reader that hashes data as it passes through.
pub struct HashingReader<R> {
    reader: R,
    hasher: Box<dyn Hasher>,
    bytes:  u64,
}

impl<R> HashingReader<R> {
    pub fn new(reader: R, hasher: Box<dyn Hasher>) -> Self {
        Self {
            reader,
            hasher,
            bytes: 0,
        }
    }

    pub fn with_algorithm(reader: R, algorithm: Algorithm) -> Result<Self> {
        Ok(Self::new(reader, algorithm.hasher()?))
    }

    pub fn bytes_read(&self) -> u64 { self.bytes }

    /// Finalize the digest as lowercase hex.
    pub fn finish(self) -> String { hex::encode(self.hasher.finalize()) }

    /// Finalize and compare against an expected hex digest (case-insensitive).
    /// Returns the computed digest on success.
    pub fn verify(self, expected: &str) -> Result<String> {
        let actual = self.finish();
        if actual.eq_ignore_ascii_case(expected) {
            Ok(actual)
        } else {
            Err(VerificationError::Mismatch {
                expected: expected.to_ascii_lowercase(),
                actual,
            })
        }
    }
}

impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n > 0 {
            self.hasher.update(&buf[..n]);
            self.bytes += n as u64;
        }
        Ok(n)
    }
}

/// Hex digest of a file, read in [`CHUNK_SIZE`] chunks.
pub fn compute_file(path: impl AsRef<Path>, algorithm: Algorithm) -> Result<String> {
    compute_file_chunked(path, algorithm, CHUNK_SIZE)
}

/// Hex digest of a file, read in chunks of `chunk_size` bytes (at least one).
pub fn compute_file_chunked(
    path: impl AsRef<Path>,
    algorithm: Algorithm,
    chunk_size: usize,
) -> Result<String> {
    let path = path.as_ref();
    let hasher = algorithm.hasher()?;
    let file = File::open(path).map_err(read_error(path))?;
    let mut reader = HashingReader::new(file, hasher);
    let mut buffer = vec![0u8; chunk_size.max(1)];

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(read_error(path)(e)),
        }
    }

    let bytes = reader.bytes_read();
    let digest = reader.finish();
    tracing::trace!(path = %path.display(), %algorithm, bytes, "computed file digest");
    Ok(digest)
}

pub fn compute_bytes(data: &[u8], algorithm: Algorithm) -> Result<String> {
    let mut hasher = algorithm.hasher()?;
    hasher.update(data);
    Ok(hex::encode(hasher.finalize()))
}

//! Streaming digests for checksum manifests.
//!
//! Algorithms are picked at runtime by name, the way `shasum`-style manifest
//! suffixes name them (`data.csv.sha256`). Files are hashed in fixed-size chunks,
//! so memory stays bounded regardless of file size.
//!
//! # Example
//!
//! ```
//! use sumfile_verify::{Algorithm, compute_bytes};
//!
//! let alg = Algorithm::normalize("SHA-256").unwrap();
//! let hex = compute_bytes(b"hello world", alg).unwrap();
//! assert_eq!(hex, "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9");
//! ```

pub use self::algorithm::Algorithm;
pub use self::error::{Result, VerificationError};
pub use self::hasher::{DigestHasher, Hasher};
pub use self::reader::{CHUNK_SIZE, HashingReader, compute_bytes, compute_file, compute_file_chunked};

#[cfg(feature = "sha2")]
pub use self::hasher::Sha256Hasher;

#[cfg(feature = "blake3")]
pub use self::hasher::Blake3Hasher;

mod algorithm;
mod error;
mod hasher;
mod reader;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[cfg(any(feature = "legacy", feature = "sha2", feature = "sha3", feature = "blake2"))]
use crate::hasher::DigestHasher;
use crate::hasher::Hasher;
use crate::{Result, VerificationError};

/// Digest functions that can be named in a manifest suffix.
///
/// Canonical names follow the usual `hashlib` spelling: lowercase, no hyphens
/// (`sha256`, `sha3_256`, `blake2b`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Algorithm {
    Md5,
    Sha1,
    Sha224,
    #[default]
    Sha256,
    Sha384,
    Sha512,
    Sha512_224,
    Sha512_256,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Blake2b,
    Blake2s,
    Blake3,
}

impl Algorithm {
    pub const ALL: [Algorithm; 15] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Sha512_224,
        Self::Sha512_256,
        Self::Sha3_224,
        Self::Sha3_256,
        Self::Sha3_384,
        Self::Sha3_512,
        Self::Blake2b,
        Self::Blake2s,
        Self::Blake3,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Sha512_224 => "sha512_224",
            Self::Sha512_256 => "sha512_256",
            Self::Sha3_224 => "sha3_224",
            Self::Sha3_256 => "sha3_256",
            Self::Sha3_384 => "sha3_384",
            Self::Sha3_512 => "sha3_512",
            Self::Blake2b => "blake2b",
            Self::Blake2s => "blake2s",
            Self::Blake3 => "blake3",
        }
    }

    /// Look up an algorithm by name after lowercasing and removing hyphens.
    ///
    /// Names whose implementation was compiled out are reported as missing.
    pub fn normalize(name: &str) -> Result<Self> {
        let canonical = name.trim().to_lowercase().replace('-', "");
        Self::ALL
            .into_iter()
            .find(|alg| alg.as_str() == canonical && alg.is_available())
            .ok_or(VerificationError::AlgorithmMissing { name: canonical })
    }

    /// Derive the algorithm from a manifest file name, e.g. `data.csv.sha256`.
    pub fn from_manifest_suffix(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension() {
            Some(suffix) => Self::normalize(&suffix.to_string_lossy()),
            None => Err(VerificationError::AlgorithmMissing {
                name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            }),
        }
    }

    pub fn insecure() -> &'static [Algorithm] { &[Self::Md5, Self::Sha1] }

    pub fn is_secure(self) -> bool { !Self::insecure().contains(&self) }

    /// Algorithms usable in this build.
    pub fn available() -> impl Iterator<Item = Algorithm> {
        Self::ALL.into_iter().filter(|alg| alg.is_available())
    }

    pub fn is_available(self) -> bool {
        match self {
            Self::Md5 | Self::Sha1 => cfg!(feature = "legacy"),
            Self::Sha224
            | Self::Sha256
            | Self::Sha384
            | Self::Sha512
            | Self::Sha512_224
            | Self::Sha512_256 => cfg!(feature = "sha2"),
            Self::Sha3_224 | Self::Sha3_256 | Self::Sha3_384 | Self::Sha3_512 => {
                cfg!(feature = "sha3")
            }
            Self::Blake2b | Self::Blake2s => cfg!(feature = "blake2"),
            Self::Blake3 => cfg!(feature = "blake3"),
        }
    }

    /// Digest length in bytes; the hex form is twice as long.
    pub fn digest_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha224 | Self::Sha512_224 | Self::Sha3_224 => 28,
            Self::Sha256 | Self::Sha512_256 | Self::Sha3_256 | Self::Blake2s | Self::Blake3 => 32,
            Self::Sha384 | Self::Sha3_384 => 48,
            Self::Sha512 | Self::Sha3_512 | Self::Blake2b => 64,
        }
    }

    pub fn hasher(self) -> Result<Box<dyn Hasher>> {
        match self {
            #[cfg(feature = "legacy")]
            Self::Md5 => Ok(Box::new(DigestHasher::<md5::Md5>::new())),
            #[cfg(feature = "legacy")]
            Self::Sha1 => Ok(Box::new(DigestHasher::<sha1::Sha1>::new())),
            #[cfg(feature = "sha2")]
            Self::Sha224 => Ok(Box::new(DigestHasher::<sha2::Sha224>::new())),
            #[cfg(feature = "sha2")]
            Self::Sha256 => Ok(Box::new(DigestHasher::<sha2::Sha256>::new())),
            #[cfg(feature = "sha2")]
            Self::Sha384 => Ok(Box::new(DigestHasher::<sha2::Sha384>::new())),
            #[cfg(feature = "sha2")]
            Self::Sha512 => Ok(Box::new(DigestHasher::<sha2::Sha512>::new())),
            #[cfg(feature = "sha2")]
            Self::Sha512_224 => Ok(Box::new(DigestHasher::<sha2::Sha512_224>::new())),
            #[cfg(feature = "sha2")]
            Self::Sha512_256 => Ok(Box::new(DigestHasher::<sha2::Sha512_256>::new())),
            #[cfg(feature = "sha3")]
            Self::Sha3_224 => Ok(Box::new(DigestHasher::<sha3::Sha3_224>::new())),
            #[cfg(feature = "sha3")]
            Self::Sha3_256 => Ok(Box::new(DigestHasher::<sha3::Sha3_256>::new())),
            #[cfg(feature = "sha3")]
            Self::Sha3_384 => Ok(Box::new(DigestHasher::<sha3::Sha3_384>::new())),
            #[cfg(feature = "sha3")]
            Self::Sha3_512 => Ok(Box::new(DigestHasher::<sha3::Sha3_512>::new())),
            #[cfg(feature = "blake2")]
            Self::Blake2b => Ok(Box::new(DigestHasher::<blake2::Blake2b512>::new())),
            #[cfg(feature = "blake2")]
            Self::Blake2s => Ok(Box::new(DigestHasher::<blake2::Blake2s256>::new())),
            #[cfg(feature = "blake3")]
            Self::Blake3 => Ok(Box::new(crate::hasher::Blake3Hasher::new())),
            #[allow(unreachable_patterns)]
            other => Err(VerificationError::AlgorithmMissing {
                name: other.as_str().to_string(),
            }),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Algorithm {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self> { Self::normalize(s) }
}

use std::io;
use std::path::PathBuf;

use sumfile_verify::VerificationError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no digest algorithm named {name:?}")]
    AlgorithmMissing { name: String },

    #[error("manifest '{path}' does not exist")]
    ManifestMissing { path: PathBuf },

    #[error("'{path}' is not listed in '{manifest}'")]
    EntryMissing { path: PathBuf, manifest: PathBuf },

    #[error("'{manifest}' lists {count} entries where exactly one was expected")]
    AmbiguousManifest { manifest: PathBuf, count: usize },

    #[error("digest mismatch for '{path}': computed {actual}, expected {expected}")]
    DigestMismatch {
        path:     PathBuf,
        expected: String,
        actual:   String,
    },

    #[error("an entry for '{path}' already exists ({})", relation(.existing, .new))]
    EntryExists {
        path:     PathBuf,
        existing: String,
        new:      Option<String>,
    },

    #[error("the entry for '{path}' is {existing}, which contradicts {}", describe(.new))]
    EntryConflict {
        path:     PathBuf,
        existing: String,
        new:      Option<String>,
    },

    #[error("'{path}' is not contained in '{directory}'")]
    PathNotContained { path: PathBuf, directory: PathBuf },

    #[error("'{name}' in '{manifest}' lies in a subdirectory")]
    Subdirectory { name: String, manifest: PathBuf },

    #[error("digest {digest:?} for '{path}' is not hexadecimal")]
    InvalidDigest { path: PathBuf, digest: String },

    #[error("line {line} of '{manifest}' is malformed: {reason}")]
    Malformed {
        manifest: PathBuf,
        line:     usize,
        reason:   &'static str,
    },

    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Verification(VerificationError),

    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error(transparent)]
    Fs(#[from] sumfile_fs::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] figment::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`], one per remediation a user would take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Algorithm,
    ManifestMissing,
    EntryMissing,
    Ambiguous,
    Mismatch,
    PolicyConflict,
    Structure,
    Filesystem,
    Config,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlgorithmMissing { .. } => ErrorKind::Algorithm,
            Self::ManifestMissing { .. } => ErrorKind::ManifestMissing,
            Self::EntryMissing { .. } => ErrorKind::EntryMissing,
            Self::AmbiguousManifest { .. } => ErrorKind::Ambiguous,
            Self::DigestMismatch { .. } | Self::Verification(_) => ErrorKind::Mismatch,
            Self::EntryExists { .. } | Self::EntryConflict { .. } => ErrorKind::PolicyConflict,
            Self::PathNotContained { .. }
            | Self::Subdirectory { .. }
            | Self::Malformed { .. }
            | Self::InvalidDigest { .. }
            | Self::Pattern(_) => ErrorKind::Structure,
            Self::Read { .. } | Self::Fs(_) => ErrorKind::Filesystem,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Whether this is a failed integrity check rather than a usage or I/O problem.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::ManifestMissing
                | ErrorKind::EntryMissing
                | ErrorKind::Ambiguous
                | ErrorKind::Mismatch
        )
    }

    /// The underlying I/O error kind for filesystem failures.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Read { source, .. } => Some(source.kind()),
            Self::Fs(e) => e.io_kind(),
            _ => None,
        }
    }
}

impl From<VerificationError> for Error {
    fn from(e: VerificationError) -> Self {
        match e {
            VerificationError::AlgorithmMissing { name } => Self::AlgorithmMissing { name },
            e @ VerificationError::Mismatch { .. } => Self::Verification(e),
            VerificationError::Read { path, source } => Self::Read { path, source },
        }
    }
}

fn relation(existing: &str, new: &Option<String>) -> &'static str {
    match new {
        Some(new) if new == existing => "matches",
        Some(_) => "differs",
        None => "removal requested",
    }
}

fn describe(new: &Option<String>) -> String {
    match new {
        Some(new) => new.clone(),
        None => "a removal".to_string(),
    }
}

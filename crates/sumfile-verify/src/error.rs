use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("no digest algorithm named {name:?}")]
    AlgorithmMissing { name: String },

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    Mismatch {
        expected: String,
        actual:   String,
    },

    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, VerificationError>;

pub(crate) fn read_error(path: &Path) -> impl FnOnce(io::Error) -> VerificationError + '_ {
    move |source| VerificationError::Read {
        path: path.to_path_buf(),
        source,
    }
}

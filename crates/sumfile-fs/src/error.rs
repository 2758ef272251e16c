use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to remove '{path}': {source}")]
    Remove { path: PathBuf, source: io::Error },

    #[error("failed to resolve '{path}': {source}")]
    Resolve { path: PathBuf, source: io::Error },

    #[error("path has no parent directory: '{0}'")]
    NoParent(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The kind of the underlying I/O failure, if there is one.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Read { source, .. }
            | Self::Write { source, .. }
            | Self::Remove { source, .. }
            | Self::Resolve { source, .. } => Some(source.kind()),
            Self::NoParent(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool { self.io_kind() == Some(io::ErrorKind::NotFound) }

    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::Remove { path, .. }
            | Self::Resolve { path, .. } => path,
            Self::NoParent(path) => path,
        }
    }
}

pub(crate) fn read_error(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
    move |source| Error::Read {
        path: path.to_path_buf(),
        source,
    }
}

pub(crate) fn write_error(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
    move |source| Error::Write {
        path: path.to_path_buf(),
        source,
    }
}

//! Filesystem primitives for checksum manifests.
//!
//! - Replace-by-rename writes, so an interrupted write never leaves a truncated file
//! - Lenient path resolution for files that may not exist yet
//! - Errors that keep the offending path and the untouched `io::Error`

mod error;
mod primitives;

pub use error::{Error, Result};
pub use primitives::{
    AtomicWriteOptions, atomic_read, atomic_write, read_text, remove_if_exists, resolve,
    resolve_entry,
};

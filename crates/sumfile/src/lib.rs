//! `shasum`-compatible checksum manifests.
//!
//! Two manifest kinds describe a file `out/data.csv`:
//!
//! - a per-file manifest `out/data.csv.sha256` holding exactly one entry
//! - a per-directory manifest `out/out.sha256` listing files of `out/`
//!
//! [`Checksums`] records and verifies digests against either or both. The manifest
//! values are immutable; every update returns a new value that is checked against an
//! [`OverwritePolicy`] before anything is written.
//!
//! ```no_run
//! use sumfile::{Checksums, OverwritePolicy};
//!
//! let checksums = Checksums::default();
//! checksums.record_digests("out/data.csv", true, true, OverwritePolicy::OnlyIfSame)?;
//! checksums.verify_any("out/data.csv", true, true, None)?;
//! # Ok::<(), sumfile::Error>(())
//! ```

pub mod codec;
pub mod config;
pub mod directory;
pub mod engine;
mod error;
mod options;
pub mod policy;
pub mod single;

pub use config::Settings;
pub use directory::DirectoryManifest;
pub use engine::Checksums;
pub use error::{Error, ErrorKind, Result};
pub use options::{ParseOptions, WriteOptions};
pub use policy::OverwritePolicy;
pub use single::SingleFileManifest;
pub use sumfile_verify::Algorithm;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// What to do when a digest is written for a path that already has one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverwritePolicy {
    /// Replace the existing digest.
    #[default]
    Always,
    /// Refuse any existing entry, even one with the same digest.
    Never,
    /// Accept an identical digest as a no-op; refuse a different one.
    OnlyIfSame,
}

impl OverwritePolicy {
    /// Check replacing `existing` with `new` (`None` meaning removal) for `path`.
    pub fn check(self, path: &Path, existing: &str, new: Option<&str>) -> Result<()> {
        match self {
            Self::Always => Ok(()),
            Self::Never => Err(Error::EntryExists {
                path:     path.to_path_buf(),
                existing: existing.to_string(),
                new:      new.map(str::to_string),
            }),
            Self::OnlyIfSame if new == Some(existing) => Ok(()),
            Self::OnlyIfSame => Err(Error::EntryConflict {
                path:     path.to_path_buf(),
                existing: existing.to_string(),
                new:      new.map(str::to_string),
            }),
        }
    }
}

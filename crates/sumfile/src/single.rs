use std::ffi::OsString;
use std::path::{Path, PathBuf};

use sumfile_verify::Algorithm;

use crate::codec;
use crate::options::WriteOptions;
use crate::policy::OverwritePolicy;
use crate::{Error, Result};

/// A manifest sitting next to one file, `<file>.<algorithm>`, with exactly one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleFileManifest {
    path:   PathBuf,
    file:   PathBuf,
    digest: String,
}

impl SingleFileManifest {
    pub fn path_for(target: impl AsRef<Path>, algorithm: Algorithm) -> PathBuf {
        let target = target.as_ref();
        let mut name = target.file_name().map(OsString::from).unwrap_or_default();
        name.push(".");
        name.push(algorithm.as_str());
        target.with_file_name(name)
    }

    /// Load the manifest belonging to `target`.
    pub fn parse(target: impl AsRef<Path>, algorithm: Algorithm) -> Result<Self> {
        Self::parse_exact(Self::path_for(target, algorithm))
    }

    /// Load a manifest by its own path.
    pub fn parse_exact(path: impl AsRef<Path>) -> Result<Self> {
        let path = sumfile_fs::resolve_entry(path)?;
        match codec::read_manifest(&path)? {
            Some(text) => Self::parse_text(&path, &text),
            None => Err(Error::ManifestMissing { path }),
        }
    }

    pub fn parse_text(path: impl AsRef<Path>, text: &str) -> Result<Self> {
        let path = sumfile_fs::resolve_entry(path)?;
        let mut entries = codec::parse_lines(text, &path, false)?;
        let raw = match entries.len() {
            1 => entries.remove(0),
            0 => {
                return Err(Error::EntryMissing {
                    path:     path.with_extension(""),
                    manifest: path,
                });
            }
            count => {
                return Err(Error::AmbiguousManifest {
                    manifest: path,
                    count,
                });
            }
        };
        let directory = parent_of(&path)?;
        let file = sumfile_fs::resolve_entry(directory.join(&raw.name))?;
        Ok(Self {
            path,
            file,
            digest: raw.digest,
        })
    }

    /// A fresh manifest for `target`, not yet written.
    pub fn create(target: impl AsRef<Path>, algorithm: Algorithm, digest: &str) -> Result<Self> {
        let file = sumfile_fs::resolve_entry(target)?;
        let digest = codec::normalize_digest(&file, digest)?;
        Ok(Self {
            path: Self::path_for(&file, algorithm),
            file,
            digest,
        })
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn file_path(&self) -> &Path { &self.file }

    pub fn digest(&self) -> &str { &self.digest }

    pub fn line(&self) -> String {
        let name = self.file.file_name().unwrap_or_default().to_string_lossy();
        codec::serialize_entry(&self.digest, &name)
    }

    /// Replace the digest, subject to `overwrite`.
    pub fn update(&self, digest: &str, overwrite: OverwritePolicy) -> Result<Self> {
        let digest = codec::normalize_digest(&self.file, digest)?;
        overwrite.check(&self.file, &self.digest, Some(&digest))?;
        Ok(Self {
            digest,
            ..self.clone()
        })
    }

    /// Point the entry at `target`, which must live in the manifest's directory.
    pub fn rename(&self, target: impl AsRef<Path>) -> Result<Self> {
        let file = sumfile_fs::resolve_entry(target)?;
        let directory = parent_of(&self.path)?;
        if file.parent() != Some(directory.as_path()) {
            return Err(Error::PathNotContained {
                path: file,
                directory,
            });
        }
        Ok(Self {
            file,
            ..self.clone()
        })
    }

    pub fn verify(&self, computed: &str) -> Result<()> {
        if self.digest.eq_ignore_ascii_case(computed) {
            Ok(())
        } else {
            Err(Error::DigestMismatch {
                path:     self.file.clone(),
                expected: self.digest.clone(),
                actual:   computed.to_ascii_lowercase(),
            })
        }
    }

    /// Only `sync` is meaningful for a single entry.
    pub fn write(&self, options: WriteOptions) -> Result<()> {
        let text = codec::render([self.line()]);
        sumfile_fs::atomic_write(&self.path, text.as_bytes(), options.atomic())?;
        tracing::debug!(manifest = %self.path.display(), "wrote file manifest");
        Ok(())
    }

    pub fn delete(&self) -> Result<()> {
        let removed = sumfile_fs::remove_if_exists(&self.path)?;
        tracing::debug!(manifest = %self.path.display(), removed, "deleted file manifest");
        Ok(())
    }
}

fn parent_of(path: &Path) -> Result<PathBuf> {
    path.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| sumfile_fs::Error::NoParent(path.to_path_buf()).into())
}

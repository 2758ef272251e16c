//! Per-directory manifests: `<dir>/<dir name>.<algorithm>` listing many files.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use sumfile_verify::Algorithm;

use crate::codec;
use crate::options::{ParseOptions, WriteOptions};
use crate::policy::OverwritePolicy;
use crate::{Error, Result};

/// An immutable view of a per-directory manifest.
///
/// Keys are resolved paths (see [`sumfile_fs::resolve_entry`]) in insertion order.
/// Every mutation returns a new value; only [`write`](Self::write) and
/// [`delete`](Self::delete) touch the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryManifest {
    path:      PathBuf,
    directory: PathBuf,
    entries:   IndexMap<PathBuf, String>,
    subdirs:   bool,
}

impl DirectoryManifest {
    /// The conventional manifest location for `directory`: `<dir>/<dir name>.<algorithm>`.
    pub fn path_for(directory: impl AsRef<Path>, algorithm: Algorithm) -> Result<PathBuf> {
        let directory = sumfile_fs::resolve(directory)?;
        let name = directory
            .file_name()
            .ok_or_else(|| sumfile_fs::Error::NoParent(directory.clone()))?
            .to_string_lossy()
            .into_owned();
        Ok(directory.join(format!("{name}.{algorithm}")))
    }

    /// An empty manifest located at `path`.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = sumfile_fs::resolve_entry(path)?;
        let directory = path
            .parent()
            .ok_or_else(|| sumfile_fs::Error::NoParent(path.clone()))?
            .to_path_buf();
        Ok(Self {
            path,
            directory,
            entries: IndexMap::new(),
            subdirs: false,
        })
    }

    /// An empty manifest at the conventional location for `directory`.
    pub fn for_directory(directory: impl AsRef<Path>, algorithm: Algorithm) -> Result<Self> {
        Self::new(Self::path_for(directory, algorithm)?)
    }

    pub fn with_entries<I, P, S>(path: impl AsRef<Path>, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, S)>,
        P: AsRef<Path>,
        S: Into<String>,
    {
        Self::new(path)?.append(entries, OverwritePolicy::Always)
    }

    /// Permit or forbid entries below subdirectories of the manifest's directory.
    pub fn allow_subdirs(mut self, subdirs: bool) -> Self {
        self.subdirs = subdirs;
        self
    }

    pub fn parse(path: impl AsRef<Path>, missing_ok: bool) -> Result<Self> {
        Self::parse_with(path, ParseOptions::new().missing_ok(missing_ok))
    }

    pub fn parse_with(path: impl AsRef<Path>, options: ParseOptions) -> Result<Self> {
        let manifest = Self::new(path)?.allow_subdirs(options.subdirs);
        match codec::read_manifest(&manifest.path)? {
            Some(text) => manifest.with_text(&text),
            None if options.missing_ok => Ok(manifest),
            None => Err(Error::ManifestMissing { path: manifest.path }),
        }
    }

    /// Decode `text` as if it had been read from `path`.
    pub fn parse_text(path: impl AsRef<Path>, text: &str, subdirs: bool) -> Result<Self> {
        Self::new(path)?.allow_subdirs(subdirs).with_text(text)
    }

    fn with_text(mut self, text: &str) -> Result<Self> {
        for raw in codec::parse_lines(text, &self.path, self.subdirs)? {
            let key = self.contain(sumfile_fs::resolve_entry(self.directory.join(&raw.name))?)?;
            self.entries.insert(key, raw.digest);
        }
        Ok(self)
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn directory(&self) -> &Path { &self.directory }

    pub fn subdirs(&self) -> bool { self.subdirs }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn entries(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.entries.iter().map(|(p, d)| (p.as_path(), d.as_str()))
    }

    pub fn into_entries(self) -> IndexMap<PathBuf, String> { self.entries }

    /// Look up a digest. Relative paths are taken relative to the manifest's directory.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        let path = path.as_ref();
        if let Some(digest) = self.entries.get(path) {
            return Some(digest);
        }
        let key = self.key(path).ok()?;
        self.entries.get(&key).map(String::as_str)
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool { self.get(path).is_some() }

    /// Insert new entries; existing ones are subject to `overwrite`.
    pub fn append<I, P, S>(&self, entries: I, overwrite: OverwritePolicy) -> Result<Self>
    where
        I: IntoIterator<Item = (P, S)>,
        P: AsRef<Path>,
        S: Into<String>,
    {
        self.update(
            entries.into_iter().map(|(p, d)| (p, Some(d.into()))),
            true,
            overwrite,
        )
    }

    /// Drop entries. Unless `missing_ok`, every path must be listed.
    pub fn remove<I, P>(&self, paths: I, missing_ok: bool) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.update(
            paths.into_iter().map(|p| (p, None)),
            missing_ok,
            OverwritePolicy::Always,
        )
    }

    /// General merge: each `(path, value)` replaces the listed digest for `path`, or
    /// deletes the entry when `value` is `None`.
    ///
    /// Listed paths are checked against `overwrite` even if the value is unchanged.
    /// Unlisted paths fail with [`Error::EntryMissing`] unless `missing_ok`, in which
    /// case they are inserted.
    pub fn update<I, P>(
        &self,
        changes: I,
        missing_ok: bool,
        overwrite: OverwritePolicy,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (P, Option<String>)>,
        P: AsRef<Path>,
    {
        let mut requested: IndexMap<PathBuf, Option<String>> = IndexMap::new();
        for (path, value) in changes {
            let key = self.key(path.as_ref())?;
            let value = value.map(|d| codec::normalize_digest(&key, &d)).transpose()?;
            requested.insert(key, value);
        }

        let mut updated = IndexMap::with_capacity(self.entries.len() + requested.len());
        for (path, existing) in &self.entries {
            match requested.get(path) {
                None => {
                    updated.insert(path.clone(), existing.clone());
                }
                Some(new) => {
                    overwrite.check(path, existing, new.as_deref())?;
                    if let Some(new) = new {
                        updated.insert(path.clone(), new.clone());
                    }
                }
            }
        }

        for (path, new) in requested {
            if self.entries.contains_key(&path) {
                continue;
            }
            if !missing_ok {
                return Err(Error::EntryMissing {
                    path,
                    manifest: self.path.clone(),
                });
            }
            if let Some(new) = new {
                updated.insert(self.contain(path)?, new);
            }
        }

        Ok(self.with_map(updated))
    }

    /// Recompute every listed digest with `f`; `None` deletes the entry.
    ///
    /// An unchanged value is kept without consulting `overwrite`. No entries are added.
    pub fn update_with<F>(&self, mut f: F, overwrite: OverwritePolicy) -> Result<Self>
    where
        F: FnMut(&Path) -> Option<String>,
    {
        let mut updated = IndexMap::with_capacity(self.entries.len());
        for (path, existing) in &self.entries {
            let new = f(path).map(|d| codec::normalize_digest(path, &d)).transpose()?;
            if new.as_deref() == Some(existing.as_str()) {
                updated.insert(path.clone(), existing.clone());
                continue;
            }
            overwrite.check(path, existing, new.as_deref())?;
            if let Some(new) = new {
                updated.insert(path.clone(), new);
            }
        }
        Ok(self.with_map(updated))
    }

    /// Union with `other`, failing on the first path listed in both.
    pub fn merge(&self, other: &DirectoryManifest) -> Result<Self> {
        let mut merged = self.entries.clone();
        for (path, digest) in &other.entries {
            if let Some(existing) = self.entries.get(path) {
                return Err(Error::EntryExists {
                    path:     path.clone(),
                    existing: existing.clone(),
                    new:      Some(digest.clone()),
                });
            }
            merged.insert(self.contain(path.clone())?, digest.clone());
        }
        Ok(self.with_map(merged))
    }

    /// Drop every listed path that is present; absent ones are ignored.
    pub fn subtract<I, P>(&self, paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.remove(paths, true)
    }

    /// The lines that [`write`](Self::write) would produce.
    pub fn lines(&self, sort: bool) -> Result<Vec<String>> {
        let mut named = Vec::with_capacity(self.entries.len());
        for (path, digest) in &self.entries {
            let name = codec::relative_name(&self.directory, path).ok_or_else(|| {
                Error::PathNotContained {
                    path:      path.clone(),
                    directory: self.directory.clone(),
                }
            })?;
            named.push((name, digest.as_str()));
        }
        if sort {
            named.sort();
        }
        Ok(named
            .into_iter()
            .map(|(name, digest)| codec::serialize_entry(digest, &name))
            .collect())
    }

    pub fn write(&self, options: WriteOptions) -> Result<()> {
        if options.remove_if_empty && self.entries.is_empty() {
            let removed = sumfile_fs::remove_if_exists(&self.path)?;
            tracing::debug!(manifest = %self.path.display(), removed, "removed empty manifest");
            return Ok(());
        }
        let text = codec::render(self.lines(options.sort)?);
        sumfile_fs::atomic_write(&self.path, text.as_bytes(), options.atomic())?;
        tracing::debug!(
            manifest = %self.path.display(),
            entries = self.entries.len(),
            "wrote directory manifest"
        );
        Ok(())
    }

    pub fn delete(&self) -> Result<()> {
        let removed = sumfile_fs::remove_if_exists(&self.path)?;
        tracing::debug!(manifest = %self.path.display(), removed, "deleted directory manifest");
        Ok(())
    }

    /// Check `computed` against the listed digest for `path`.
    ///
    /// The manifest file itself must exist on disk.
    pub fn verify(&self, path: impl AsRef<Path>, computed: &str) -> Result<()> {
        if !self.path.is_file() {
            return Err(Error::ManifestMissing {
                path: self.path.clone(),
            });
        }
        let key = self.key(path.as_ref())?;
        let expected = self.entries.get(&key).ok_or_else(|| Error::EntryMissing {
            path:     key.clone(),
            manifest: self.path.clone(),
        })?;
        if !expected.eq_ignore_ascii_case(computed) {
            return Err(Error::DigestMismatch {
                path:     key,
                expected: expected.clone(),
                actual:   computed.to_ascii_lowercase(),
            });
        }
        Ok(())
    }

    fn with_map(&self, entries: IndexMap<PathBuf, String>) -> Self {
        Self {
            path: self.path.clone(),
            directory: self.directory.clone(),
            entries,
            subdirs: self.subdirs,
        }
    }

    fn key(&self, path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(sumfile_fs::resolve_entry(path)?)
        } else {
            Ok(sumfile_fs::resolve_entry(self.directory.join(path))?)
        }
    }

    fn contain(&self, key: PathBuf) -> Result<PathBuf> {
        let contained = if self.subdirs {
            key != self.directory && key.starts_with(&self.directory)
        } else {
            key.parent() == Some(self.directory.as_path())
        };
        if contained {
            Ok(key)
        } else {
            Err(Error::PathNotContained {
                path:      key,
                directory: self.directory.clone(),
            })
        }
    }
}

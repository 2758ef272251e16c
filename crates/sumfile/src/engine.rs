//! Recording and verifying digests against both manifest kinds at once.

use std::fs;
use std::path::{Path, PathBuf};

use sumfile_verify::{Algorithm, CHUNK_SIZE};
use tracing::debug;

use crate::config::Settings;
use crate::directory::DirectoryManifest;
use crate::options::{ParseOptions, WriteOptions};
use crate::policy::OverwritePolicy;
use crate::single::SingleFileManifest;
use crate::{Error, Result};

/// Digest bookkeeping for one algorithm.
///
/// A file `out/data.csv` may be described by its per-file manifest
/// `out/data.csv.<alg>` and by the per-directory manifest `out/out.<alg>`.
#[derive(Debug, Clone)]
pub struct Checksums {
    algorithm:  Algorithm,
    chunk_size: usize,
    subdirs:    bool,
    write:      WriteOptions,
    overwrite:  OverwritePolicy,
}

impl Default for Checksums {
    fn default() -> Self { Self::new(Self::default_algorithm()) }
}

impl Checksums {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            chunk_size: CHUNK_SIZE,
            subdirs: false,
            write: WriteOptions::new(),
            overwrite: OverwritePolicy::default(),
        }
    }

    pub fn from_name(name: &str) -> Result<Self> { Ok(Self::new(Algorithm::normalize(name)?)) }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(settings.algorithm()?)
            .with_chunk_size(settings.chunk_size)
            .with_subdirs(settings.subdirs)
            .with_write_options(settings.write_options())
            .with_overwrite(settings.overwrite))
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_subdirs(mut self, subdirs: bool) -> Self {
        self.subdirs = subdirs;
        self
    }

    pub fn with_write_options(mut self, write: WriteOptions) -> Self {
        self.write = write;
        self
    }

    pub fn with_overwrite(mut self, overwrite: OverwritePolicy) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn algorithm(&self) -> Algorithm { self.algorithm }

    /// The policy [`record`](Self::record) applies.
    pub fn default_policy(&self) -> OverwritePolicy { self.overwrite }

    pub fn default_algorithm() -> Algorithm { Algorithm::Sha256 }

    /// The algorithm named by a manifest's suffix.
    pub fn guess_algorithm(path: impl AsRef<Path>) -> Result<Algorithm> {
        Ok(Algorithm::from_manifest_suffix(path)?)
    }

    pub fn calc_hash(&self, path: impl AsRef<Path>) -> Result<String> {
        Ok(sumfile_verify::compute_file_chunked(
            path,
            self.algorithm,
            self.chunk_size,
        )?)
    }

    /// Hash `path` and compare with `expected`, returning the computed digest.
    pub fn verify_hex(&self, path: impl AsRef<Path>, expected: &str) -> Result<String> {
        let path = path.as_ref();
        let actual = self.calc_hash(path)?;
        check_digest(path, expected, &actual)?;
        Ok(actual)
    }

    pub fn filesum_of_file(&self, path: impl AsRef<Path>) -> PathBuf {
        SingleFileManifest::path_for(path, self.algorithm)
    }

    pub fn dirsum_of_file(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = sumfile_fs::resolve_entry(path)?;
        let parent = path
            .parent()
            .ok_or_else(|| sumfile_fs::Error::NoParent(path.clone()))?;
        DirectoryManifest::path_for(parent, self.algorithm)
    }

    pub fn dirsum_of_dir(&self, directory: impl AsRef<Path>) -> Result<PathBuf> {
        DirectoryManifest::path_for(directory, self.algorithm)
    }

    /// The per-file manifest of `path`, or `None` if it was never written.
    pub fn load_filesum_of_file(&self, path: impl AsRef<Path>) -> Result<Option<SingleFileManifest>> {
        match SingleFileManifest::parse(path, self.algorithm) {
            Ok(manifest) => Ok(Some(manifest)),
            Err(Error::ManifestMissing { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn load_dirsum_of_file(&self, path: impl AsRef<Path>, missing_ok: bool) -> Result<DirectoryManifest> {
        DirectoryManifest::parse_with(self.dirsum_of_file(path)?, self.parse_options(missing_ok))
    }

    pub fn load_dirsum_of_dir(
        &self,
        directory: impl AsRef<Path>,
        missing_ok: bool,
    ) -> Result<DirectoryManifest> {
        DirectoryManifest::parse_with(self.dirsum_of_dir(directory)?, self.parse_options(missing_ok))
    }

    /// [`record_digests`](Self::record_digests) under the configured policy.
    pub fn record(&self, path: impl AsRef<Path>, to_file: bool, to_dir: bool) -> Result<Option<String>> {
        self.record_digests(path, to_file, to_dir, self.overwrite)
    }

    /// Record the digest of `path` in its per-file manifest, its per-directory
    /// manifest, or both.
    ///
    /// The file is hashed once. Both manifests are built and checked against
    /// `overwrite` before either is written, so a refused update writes nothing.
    /// Returns `None` without touching the filesystem if no target is requested.
    pub fn record_digests(
        &self,
        path: impl AsRef<Path>,
        to_file: bool,
        to_dir: bool,
        overwrite: OverwritePolicy,
    ) -> Result<Option<String>> {
        if !to_file && !to_dir {
            return Ok(None);
        }
        let path = sumfile_fs::resolve_entry(path)?;

        let existing_file = match to_file {
            true => Some(self.load_filesum_of_file(&path)?),
            false => None,
        };
        let existing_dir = match to_dir {
            true => Some(self.load_dirsum_of_file(&path, true)?),
            false => None,
        };

        let digest = self.calc_hash(&path)?;

        let file_manifest = match existing_file {
            Some(Some(existing)) => Some(existing.update(&digest, overwrite)?.rename(&path)?),
            Some(None) => Some(SingleFileManifest::create(&path, self.algorithm, &digest)?),
            None => None,
        };
        let dir_manifest = existing_dir
            .map(|m| m.append([(&path, digest.as_str())], overwrite))
            .transpose()?;

        if let Some(manifest) = &file_manifest {
            manifest.write(self.write)?;
        }
        if let Some(manifest) = &dir_manifest {
            manifest.write(self.write)?;
        }

        debug!(
            path = %path.display(),
            algorithm = %self.algorithm,
            %digest,
            to_file,
            to_dir,
            "recorded digest"
        );
        Ok(Some(digest))
    }

    /// Verify `path` against a known digest and/or its manifests.
    ///
    /// A `precomputed` digest is compared first, so a wrong expectation is reported as a
    /// mismatch whatever the state of the manifests. Requested manifests must then exist
    /// and parse before they are compared, per-file first. Without `precomputed` the
    /// manifests are loaded before the file is hashed. Returns the computed digest, or
    /// `None` if there was nothing to check.
    pub fn verify_any(
        &self,
        path: impl AsRef<Path>,
        file_hash: bool,
        dir_hash: bool,
        precomputed: Option<&str>,
    ) -> Result<Option<String>> {
        if !file_hash && !dir_hash && precomputed.is_none() {
            return Ok(None);
        }
        let path = sumfile_fs::resolve_entry(path)?;

        let mut digest = None;
        if let Some(expected) = precomputed {
            let computed = self.calc_hash(&path)?;
            check_digest(&path, expected, &computed)?;
            digest = Some(computed);
        }

        let file_manifest = match file_hash {
            true => Some(SingleFileManifest::parse(&path, self.algorithm)?),
            false => None,
        };
        let dir_manifest = match dir_hash {
            true => Some(self.load_dirsum_of_file(&path, false)?),
            false => None,
        };
        let digest = match digest {
            Some(digest) => digest,
            None => self.calc_hash(&path)?,
        };

        if let Some(manifest) = &file_manifest {
            manifest.verify(&digest)?;
        }
        if let Some(manifest) = &dir_manifest {
            manifest.verify(&path, &digest)?;
        }

        debug!(
            path = %path.display(),
            algorithm = %self.algorithm,
            %digest,
            file_hash,
            dir_hash,
            "verified digest"
        );
        Ok(Some(digest))
    }

    /// Forget `path`: delete its per-file manifest and drop it from the per-directory one.
    ///
    /// Missing manifests and entries are ignored.
    pub fn delete_any(&self, path: impl AsRef<Path>, remove_if_empty: bool) -> Result<()> {
        let path = sumfile_fs::resolve_entry(path)?;

        let filesum = self.filesum_of_file(&path);
        if sumfile_fs::remove_if_exists(&filesum)? {
            debug!(manifest = %filesum.display(), "deleted file manifest");
        }

        let dirsum = self.load_dirsum_of_file(&path, true)?;
        let updated = match dirsum.remove([&path], true) {
            Ok(updated) => updated,
            Err(Error::PathNotContained { .. }) => return Ok(()),
            Err(e) => return Err(e),
        };
        if updated.len() != dirsum.len() || (remove_if_empty && updated.is_empty()) {
            updated.write(self.write.remove_if_empty(remove_if_empty))?;
        }
        Ok(())
    }

    /// A directory manifest over the regular files directly inside `directory`.
    ///
    /// Files named with this algorithm's suffix are skipped. Nothing is written.
    pub fn generate_dirsum(&self, directory: impl AsRef<Path>) -> Result<DirectoryManifest> {
        self.generate_dirsum_matching(directory, "*")
    }

    /// Like [`generate_dirsum`](Self::generate_dirsum), limited to file names matching
    /// the glob `pattern` (e.g. `*.csv`).
    pub fn generate_dirsum_matching(
        &self,
        directory: impl AsRef<Path>,
        pattern: &str,
    ) -> Result<DirectoryManifest> {
        let pattern = glob::Pattern::new(pattern)?;
        let manifest = DirectoryManifest::for_directory(directory, self.algorithm)?
            .allow_subdirs(self.subdirs);
        let root = manifest.directory().to_path_buf();

        let read_error = |source| Error::Read {
            path: root.clone(),
            source,
        };
        let mut files = Vec::new();
        for entry in fs::read_dir(&root).map_err(read_error)? {
            let path = entry.map_err(read_error)?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().is_some_and(|ext| ext == self.algorithm.as_str()) {
                continue;
            }
            let name = path.file_name().unwrap_or_default().to_string_lossy();
            if !pattern.matches(&name) {
                continue;
            }
            files.push(path);
        }
        files.sort();

        let mut entries = Vec::with_capacity(files.len());
        for path in files {
            let digest = self.calc_hash(&path)?;
            entries.push((path, digest));
        }
        debug!(directory = %root.display(), files = entries.len(), "generated directory manifest");
        manifest.append(entries, OverwritePolicy::Never)
    }

    fn parse_options(&self, missing_ok: bool) -> ParseOptions {
        ParseOptions::new().missing_ok(missing_ok).subdirs(self.subdirs)
    }
}

fn check_digest(path: &Path, expected: &str, actual: &str) -> Result<()> {
    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(Error::DigestMismatch {
            path:     path.to_path_buf(),
            expected: expected.to_ascii_lowercase(),
            actual:   actual.to_string(),
        })
    }
}

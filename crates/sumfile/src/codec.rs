//! The `shasum` line format.
//!
//! Each line is `<hex digest><SEP><file name>`, where `SEP` is a space followed by a
//! space (text mode) or an asterisk (binary mode). Lines are always written in binary
//! mode: `<digest> *<name>`.

use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Error, Result};

static SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r" [ *]").unwrap());

static HEX_DIGEST: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]+$").unwrap());

/// A decoded line: lowercase digest and the file name relative to the manifest directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub digest: String,
    pub name:   PathBuf,
}

/// Decode manifest text. `source` names the manifest in errors.
///
/// Blank lines are skipped. `.` and empty path segments are dropped from names; a name
/// that still has more than one segment is rejected unless `subdirs` is set.
pub fn parse_lines(text: &str, source: &Path, subdirs: bool) -> Result<Vec<RawEntry>> {
    let mut entries = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let malformed = |reason| Error::Malformed {
            manifest: source.to_path_buf(),
            line: index + 1,
            reason,
        };

        let sep = SEPARATOR
            .find(line)
            .ok_or_else(|| malformed("no separator between digest and file name"))?;
        let digest = &line[..sep.start()];
        let raw_name = line[sep.end()..].trim();

        if digest.is_empty() {
            return Err(malformed("empty digest"));
        }
        if !HEX_DIGEST.is_match(digest) {
            return Err(malformed("digest is not hexadecimal"));
        }

        let segments: Vec<&str> = raw_name
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();
        if segments.is_empty() {
            return Err(malformed("empty file name"));
        }
        if segments.len() > 1 && !subdirs {
            return Err(Error::Subdirectory {
                name:     raw_name.to_string(),
                manifest: source.to_path_buf(),
            });
        }

        entries.push(RawEntry {
            digest: digest.to_ascii_lowercase(),
            name:   segments.iter().collect(),
        });
    }

    Ok(entries)
}

/// Check that `digest` is non-empty hex and return it lowercased. `path` names the entry
/// in the error.
pub fn normalize_digest(path: &Path, digest: &str) -> Result<String> {
    if HEX_DIGEST.is_match(digest) {
        Ok(digest.to_ascii_lowercase())
    } else {
        Err(Error::InvalidDigest {
            path:   path.to_path_buf(),
            digest: digest.to_string(),
        })
    }
}

pub fn serialize_entry(digest: &str, name: &str) -> String { format!("{digest} *{name}") }

/// Join lines into manifest text, LF-terminated.
pub fn render<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut text = String::new();
    for line in lines {
        text.push_str(line.as_ref());
        text.push('\n');
    }
    text
}

/// The name written for `path` in a manifest living in `directory`: its components
/// relative to `directory`, joined with `/`.
pub fn relative_name(directory: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(directory).ok()?;
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            _ => return None,
        }
    }
    if parts.is_empty() { None } else { Some(parts.join("/")) }
}

/// Read manifest text, mapping a missing file to `None`.
pub(crate) fn read_manifest(path: &Path) -> Result<Option<String>> {
    match sumfile_fs::read_text(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

use crate::{Error, Result};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

fn resolve_error(path: &Path, source: io::Error) -> Error {
    Error::Resolve {
        path: path.to_path_buf(),
        source,
    }
}

/// Make `path` absolute, following symlinks for every prefix that exists.
///
/// Components past the deepest existing ancestor are appended lexically, with `.`
/// dropped and `..` popping the previous component, so paths to files that are not
/// written yet still resolve.
pub fn resolve(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| resolve_error(path, e))?
            .join(path)
    };

    let mut resolved = PathBuf::new();
    let mut on_disk = true;
    for component in absolute.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                resolved.push(name);
                if on_disk {
                    match fs::canonicalize(&resolved) {
                        Ok(canonical) => resolved = canonical,
                        Err(e) if e.kind() == io::ErrorKind::NotFound => on_disk = false,
                        Err(e) => return Err(resolve_error(path, e)),
                    }
                }
            }
        }
    }
    Ok(resolved)
}

/// Resolve the parent directory of `path` but keep its final component as written,
/// so a symlinked file keeps the name it has in its own directory.
pub fn resolve_entry(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() { Path::new(".") } else { parent };
            Ok(resolve(parent)?.join(name))
        }
        _ => resolve(path),
    }
}

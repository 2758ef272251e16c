use crate::error::{read_error, write_error};
use crate::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default)]
pub struct AtomicWriteOptions {
    pub permissions:    Option<u32>,
    pub sync:           bool,
    pub create_parents: bool,
}

impl AtomicWriteOptions {
    pub fn new() -> Self { Self::default() }

    pub fn permissions(mut self, mode: u32) -> Self {
        self.permissions = Some(mode);
        self
    }

    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    pub fn create_parents(mut self, create_parents: bool) -> Self {
        self.create_parents = create_parents;
        self
    }
}

/// Replace `path` with `content` by writing a sibling temporary file and renaming it
/// over the target. Readers observe either the old or the new content, never a mix.
pub fn atomic_write(
    path: impl AsRef<Path>,
    content: &[u8],
    options: AtomicWriteOptions,
) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if p.as_os_str().is_empty() => Path::new("."),
        Some(p) => p,
        None => return Err(Error::NoParent(path.to_path_buf())),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::NoParent(path.to_path_buf()))?
        .to_string_lossy();

    if options.create_parents {
        fs::create_dir_all(parent).map_err(write_error(parent))?;
    }

    let tmp_path = parent.join(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

    fs::write(&tmp_path, content).map_err(write_error(&tmp_path))?;

    #[cfg(unix)]
    if let Some(mode) = options.permissions {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) = fs::set_permissions(&tmp_path, fs::Permissions::from_mode(mode)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(write_error(&tmp_path)(e));
        }
    }

    if options.sync {
        let synced = fs::File::open(&tmp_path).and_then(|file| file.sync_all());
        if let Err(e) = synced {
            let _ = fs::remove_file(&tmp_path);
            return Err(write_error(&tmp_path)(e));
        }
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        write_error(path)(e)
    })?;

    tracing::trace!(path = %path.display(), bytes = content.len(), "atomically replaced file");
    Ok(())
}

pub fn atomic_read(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(read_error(path))
}

/// Read a UTF-8 text file. Invalid UTF-8 is reported as `InvalidData`.
pub fn read_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = atomic_read(path)?;
    String::from_utf8(bytes)
        .map_err(|e| read_error(path)(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Remove a file, treating an already-missing file as success.
/// Returns whether a file was actually removed.
pub fn remove_if_exists(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(Error::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

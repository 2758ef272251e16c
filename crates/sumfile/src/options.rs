use sumfile_fs::AtomicWriteOptions;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Treat a missing manifest as an empty one.
    pub missing_ok: bool,
    /// Permit entries in subdirectories of the manifest's directory.
    pub subdirs:    bool,
}

impl ParseOptions {
    pub fn new() -> Self { Self::default() }

    pub fn missing_ok(mut self, missing_ok: bool) -> Self {
        self.missing_ok = missing_ok;
        self
    }

    pub fn subdirs(mut self, subdirs: bool) -> Self {
        self.subdirs = subdirs;
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Order entries by file name instead of insertion order.
    pub sort:            bool,
    /// Delete the manifest rather than write one with no entries.
    pub remove_if_empty: bool,
    /// fsync the temporary file before it replaces the manifest.
    pub sync:            bool,
}

impl WriteOptions {
    pub fn new() -> Self { Self::default() }

    pub fn sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    pub fn remove_if_empty(mut self, remove_if_empty: bool) -> Self {
        self.remove_if_empty = remove_if_empty;
        self
    }

    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    pub(crate) fn atomic(&self) -> AtomicWriteOptions {
        AtomicWriteOptions::new().sync(self.sync).create_parents(true)
    }
}

use std::path::Path;

use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use sumfile_verify::{Algorithm, CHUNK_SIZE};

use crate::options::{ParseOptions, WriteOptions};
use crate::policy::OverwritePolicy;
use crate::Result;

/// Engine settings, read from TOML over built-in defaults.
///
/// ```toml
/// algorithm = "sha3_256"
/// chunk_size = 65536
/// subdirs = true
/// overwrite = "only-if-same"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub algorithm:       String,
    pub chunk_size:      usize,
    pub subdirs:         bool,
    pub sort:            bool,
    pub remove_if_empty: bool,
    pub sync:            bool,
    pub overwrite:       OverwritePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            algorithm:       Algorithm::default().as_str().to_string(),
            chunk_size:      CHUNK_SIZE,
            subdirs:         false,
            sort:            false,
            remove_if_empty: false,
            sync:            false,
            overwrite:       OverwritePolicy::default(),
        }
    }
}

impl Settings {
    /// Layer the TOML file at `path` over the defaults. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let settings: Self = Self::figment().merge(Toml::file(path.as_ref())).extract()?;
        tracing::debug!(path = %path.as_ref().display(), ?settings, "loaded settings");
        Ok(settings)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(Self::figment().merge(Toml::string(text)).extract()?)
    }

    fn figment() -> Figment { Figment::from(Serialized::defaults(Self::default())) }

    pub fn algorithm(&self) -> Result<Algorithm> { Ok(Algorithm::normalize(&self.algorithm)?) }

    pub fn write_options(&self) -> WriteOptions {
        WriteOptions::new()
            .sort(self.sort)
            .remove_if_empty(self.remove_if_empty)
            .sync(self.sync)
    }

    pub fn parse_options(&self, missing_ok: bool) -> ParseOptions {
        ParseOptions::new().missing_ok(missing_ok).subdirs(self.subdirs)
    }
}

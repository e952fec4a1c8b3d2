use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use xdg::BaseDirectories;

use crate::error::StoreError;

/// Persisted `key -> value` pairs for one save namespace.
///
/// The store is a flat TOML document of string pairs. It knows nothing about
/// cosmetic values; the owning menu decides what gets written into it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueStore {
    entries: BTreeMap<String, String>,
}

impl ValueStore {
    pub fn new() -> Self {
        ValueStore::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Load a store from `path`.
    ///
    /// A missing file is not an error: it yields an empty store so a first
    /// run starts from defaults.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ValueStore::default());
            }
            Err(e) => {
                return Err(StoreError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        toml::from_str(&contents).map_err(|e| StoreError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Read the store at the default path, degrading to empty on any failure.
    pub fn read() -> Self {
        let path = match store_path() {
            Some(path) => path,
            None => return ValueStore::default(),
        };

        match Self::load(&path) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("Falling back to empty value store: {}", e);
                ValueStore::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let contents = toml::to_string(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        fs::write(path, contents).map_err(|e| StoreError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::info!("Saved {} values to {}", self.len(), path.display());
        Ok(())
    }
}

/// Default store location under the XDG config home.
pub fn store_path() -> Option<PathBuf> {
    let pgm = env!("CARGO_PKG_NAME");
    let xdg_dirs = BaseDirectories::with_prefix(pgm);
    let config_home = xdg_dirs.get_config_home()?;
    Some(config_home.join("values.toml"))
}

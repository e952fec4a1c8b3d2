use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the owning menu container.
///
/// Config values themselves never fail: typed reads degrade to zero values
/// and string assignment always succeeds. Failures only exist at the
/// container and store boundaries.
#[derive(Error, Debug)]
pub enum MenuError {
    #[error("duplicate config key: {0}")]
    DuplicateKey(String),
}

/// Errors raised by the value store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read value store at {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse value store at {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize value store")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write value store at {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for menu operations.
pub type MenuResult<T> = Result<T, MenuError>;

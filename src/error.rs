use std::path::PathBuf;

use thiserror::Error;

pub type FxResult<T> = Result<T, FxError>;

#[derive(Debug, Error)]
pub enum FxError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    System(#[from] SystemError),
}

/// Errors related to the shape and availability of loaded rate data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("No episodes found in data source: {0}")]
    NoEpisodes(String),

    #[error("Episode '{0}' contains no rate records")]
    EmptyEpisode(String),
}

/// Errors related to the Gym Environment configuration and execution loop.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("Invalid action code {0}: expected 0 (hold), 1 (long) or 2 (short)")]
    InvalidAction(i64),

    #[error("Invalid environment configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid render mode: '{0}'")]
    InvalidRenderMode(String),
}

/// Errors related to File I/O and deserialization of the rate files.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("IO operation failed")]
    Io(#[from] std::io::Error),

    #[error("Failed to read data directory {path:?}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read rate file {path:?}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed rate file {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Errors related to internal invariants. These indicate bugs, not user input.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Index out of range: {0}")]
    IndexOutOfRange(String),
}

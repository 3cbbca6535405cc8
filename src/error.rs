use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a job script path: {0}")]
    InvalidJobScript(PathBuf),

    #[error("No job properties found in {0}")]
    MissingProperties(PathBuf),

    #[error("Invalid job properties in {path}: {source}")]
    InvalidProperties {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid resources: {0}")]
    InvalidResources(String),

    #[error("Invalid wall time {0:?}, expected HH:MM:SS")]
    InvalidWallTime(String),
}

pub type Result<T> = std::result::Result<T, BatchError>;

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage engine error: {0}")]
    Sled(#[from] sled::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode or decode record: {0}")]
    Codec(#[from] bincode::Error),

    #[error("corrupt object {name}: {reason}")]
    Corrupt { name: String, reason: String },

    #[error("invalid object name '{0}'")]
    InvalidName(String),

    #[error("{kind} {id} not found")]
    Missing { kind: &'static str, id: u64 },

    #[error("{kind} {id} already exists")]
    Duplicate { kind: &'static str, id: u64 },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

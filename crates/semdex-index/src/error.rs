use semdex_config::ConfigError;
use semdex_store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Debug, Error)]
pub enum IndexError {
    /// Rejected before any state was touched.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("embedding provider failed: {0:#}")]
    Provider(anyhow::Error),

    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),

    /// Reading a source tree failed.
    #[error("cannot scan {}: {cause:#}", path.display())]
    Scan { path: PathBuf, cause: anyhow::Error },

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },

    #[error("project {0} has an index job in progress")]
    Busy(u64),
}

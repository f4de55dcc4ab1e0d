//! Configuration type definitions
//!
//! Each section is self-contained with validation and defaults.

pub mod chunking;
pub mod core;
pub mod embedding;
pub mod search;

pub use chunking::ChunkingConfig;
pub use core::{CoreConfig, IndexBackend};
pub use embedding::{EmbeddingBackend, EmbeddingConfig};
pub use search::SearchConfig;

use serde::{Deserialize, Serialize};

/// Main configuration struct aggregating all settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// File walking and storage locations
    #[serde(default)]
    pub core: CoreConfig,

    /// Line-window chunking
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Embedding provider settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Retrieval defaults
    #[serde(default)]
    pub search: SearchConfig,
}

impl crate::validation::Validate for Config {
    fn validate(&self) -> crate::error::Result<()> {
        self.core.validate()?;
        self.chunking.validate()?;
        self.embedding.validate()?;
        self.search.validate()?;
        Ok(())
    }
}

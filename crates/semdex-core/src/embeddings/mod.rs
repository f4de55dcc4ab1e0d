pub mod external;
pub mod hash;
pub mod ollama;

pub use external::OpenAiEmbedder;
pub use hash::HashEmbedder;
pub use ollama::OllamaEmbedder;

use crate::traits::Embedder;
use anyhow::Result;
use semdex_config::{EmbeddingBackend, EmbeddingConfig};
use std::sync::Arc;
use tracing::info;

/// Build the embedder named by the configuration.
pub fn select_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    let model = (!config.model_name.is_empty()).then(|| config.model_name.clone());
    let embedder: Arc<dyn Embedder> = match config.backend {
        EmbeddingBackend::Hash => Arc::new(HashEmbedder::new(config.dimension)),
        EmbeddingBackend::Ollama => Arc::new(OllamaEmbedder::new(
            model,
            config.api_base.clone(),
            config.dimension,
        )?),
        EmbeddingBackend::Openai => Arc::new(OpenAiEmbedder::new(
            model,
            config.api_base.clone(),
            config.dimension,
        )?),
    };
    info!(
        "Using {:?} embedder (dimension {})",
        config.backend,
        embedder.dimension()
    );
    Ok(embedder)
}

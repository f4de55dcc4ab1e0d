//! Embedding provider configuration

use serde::{Deserialize, Serialize};

/// Which embedding implementation produces vectors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Deterministic hashed bag-of-tokens, no network
    #[default]
    Hash,
    /// Local Ollama server
    Ollama,
    /// OpenAI-compatible embeddings endpoint
    #[serde(alias = "external")]
    Openai,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub backend: EmbeddingBackend,

    /// Model name passed to the provider; empty selects the backend default
    #[serde(default)]
    pub model_name: String,

    /// Vector dimension, fixed for the lifetime of an index
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Override for the provider base URL
    #[serde(default)]
    pub api_base: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default(),
            model_name: String::new(),
            dimension: default_dimension(),
            api_base: None,
        }
    }
}

impl crate::validation::Validate for EmbeddingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        crate::validation::validate_positive("embedding.dimension", self.dimension, 0)
    }
}

fn default_dimension() -> usize {
    384 // all-MiniLM-L6-v2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        assert!(EmbeddingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_backend_serialization() {
        assert_eq!(
            serde_json::to_string(&EmbeddingBackend::Openai).unwrap(),
            "\"openai\""
        );
        let parsed: EmbeddingBackend = serde_json::from_str("\"external\"").unwrap();
        assert_eq!(parsed, EmbeddingBackend::Openai);
    }
}

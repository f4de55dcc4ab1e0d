use anyhow::{anyhow, Result};

/// Maps text to fixed-dimension vectors.
///
/// Implementations must be deterministic for identical input and return one
/// vector per input, in input order.
pub trait Embedder: Send + Sync {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn dimension(&self) -> usize;

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(&[text.to_string()])?
            .pop()
            .ok_or_else(|| anyhow!("Empty embedding response"))
    }
}

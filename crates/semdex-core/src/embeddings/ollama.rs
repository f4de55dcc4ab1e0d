use crate::traits::Embedder;
use anyhow::{anyhow, Result};
use reqwest::blocking::Client;

pub struct OllamaEmbedder {
    client: Client,
    model: String,
    base_url: String,
    dimension: usize,
}

impl OllamaEmbedder {
    pub fn new(model: Option<String>, base_url: Option<String>, dimension: usize) -> Result<Self> {
        let base_url = base_url
            .or_else(|| std::env::var("OLLAMA_BASE_URL").ok())
            .unwrap_or_else(|| "http://127.0.0.1:11434".to_string());
        Ok(Self {
            client: Client::builder().build()?,
            model: model.unwrap_or_else(|| "all-minilm".to_string()),
            base_url,
            dimension,
        })
    }
}

impl Embedder for OllamaEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/api/embeddings", self.base_url.trim_end_matches('/'));
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            let resp = self
                .client
                .post(&url)
                .json(&serde_json::json!({
                    "model": self.model,
                    "prompt": text,
                }))
                .send()?;

            if !resp.status().is_success() {
                let status = resp.status();
                let body = resp.text().unwrap_or_default();
                return Err(anyhow!("Ollama embeddings failed ({}): {}", status, body));
            }

            let json: serde_json::Value = resp.json()?;
            let embedding = json["embedding"]
                .as_array()
                .ok_or_else(|| anyhow!("No embedding field in Ollama response"))?
                .iter()
                .map(|v| {
                    v.as_f64()
                        .map(|f| f as f32)
                        .ok_or_else(|| anyhow!("Non-numeric value in Ollama embedding"))
                })
                .collect::<Result<Vec<f32>>>()?;
            out.push(embedding);
        }
        Ok(out)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

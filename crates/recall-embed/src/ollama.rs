use async_trait::async_trait;
use recall_core::{RecallError, Result};

use crate::provider::{Embedder, l2_normalize};

/// Ollama embeddings provider (uses /api/embeddings endpoint).
pub struct OllamaEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dims: usize,
}

impl OllamaEmbedder {
    pub fn new(model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: "http://127.0.0.1:11434".into(),
            model: model.to_string(),
            dims: 768, // common default, varies by model
        }
    }

    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dims = dims;
        self
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let body = serde_json::json!({
            "model": &self.model,
            "prompt": text,
        });

        let resp = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| RecallError::EmbeddingUnavailable(format!("ollama embedding: {}", e)))?;

        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(RecallError::EmbeddingUnavailable(format!(
                "ollama embedding error: {}",
                text
            )));
        }

        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| RecallError::EmbeddingUnavailable(e.to_string()))?;

        let mut embedding: Vec<f32> = data["embedding"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_f64().map(|f| f as f32))
                    .collect()
            })
            .unwrap_or_default();

        if embedding.is_empty() {
            return Err(RecallError::EmbeddingUnavailable(
                "ollama returned an empty embedding".to_string(),
            ));
        }

        l2_normalize(&mut embedding);
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

//! # recall-embed
//!
//! The embedding capability for the recall memory hierarchy: a pluggable
//! text-to-vector function with a fixed output dimension and L2-normalized
//! output, so inner product equals cosine similarity downstream.
//!
//! Providers:
//!
//! - [`OpenAiEmbedder`] — any OpenAI-compatible `/embeddings` endpoint.
//! - [`OllamaEmbedder`] — a local Ollama daemon.
//! - [`HashEmbedder`] — deterministic token-bucket hashing, no network.
//!   Used for tests and offline operation.

pub mod mock;
pub mod ollama;
pub mod openai;
pub mod provider;

pub use mock::HashEmbedder;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use provider::{Embedder, l2_normalize};

use std::sync::Arc;

use recall_core::{EmbedderConfig, RecallError, Result};

/// Build an embedder from configuration.
pub fn build_embedder(config: &EmbedderConfig) -> Result<Arc<dyn Embedder>> {
    match config.provider.as_str() {
        "hash" => Ok(Arc::new(HashEmbedder::new(config.dimensions))),
        "openai" => {
            let api_key = config.api_key.clone().ok_or_else(|| {
                RecallError::Config("openai embedder requires an api key".to_string())
            })?;
            let mut provider = OpenAiEmbedder::new(api_key);
            if let Some(model) = &config.model {
                provider = provider.with_model(model.clone(), config.dimensions);
            }
            if let Some(url) = &config.base_url {
                provider = provider.with_base_url(url.clone());
            }
            Ok(Arc::new(provider))
        }
        "ollama" => {
            let model = config.model.as_deref().unwrap_or("nomic-embed-text");
            let mut provider = OllamaEmbedder::new(model);
            if let Some(url) = &config.base_url {
                provider = provider.with_base_url(url.clone());
            }
            Ok(Arc::new(provider))
        }
        other => Err(RecallError::Config(format!(
            "unknown embedder provider {other:?}"
        ))),
    }
}

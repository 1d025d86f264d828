use async_trait::async_trait;
use recall_core::Result;

/// Trait for generating text embeddings.
///
/// Implementations return vectors of a fixed dimension, L2-normalized so that
/// inner product equals cosine similarity. A failing backend surfaces as
/// [`recall_core::RecallError::EmbeddingUnavailable`]; callers decide whether
/// to retry.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// The dimensionality of the output embeddings.
    fn dimensions(&self) -> usize;

    /// Provider name.
    fn name(&self) -> &str;
}

/// Scale a vector to unit L2 norm in place. Zero vectors are left unchanged.
pub fn l2_normalize(vec: &mut [f32]) {
    let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vec.iter_mut() {
            *x /= norm;
        }
    }
}

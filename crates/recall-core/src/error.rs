use thiserror::Error;

/// Unified error type for the recall memory hierarchy.
#[derive(Error, Debug)]
pub enum RecallError {
    // ── Embedding capability ───────────────────────────────────
    #[error("embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    // ── Long-term store ────────────────────────────────────────
    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("store inconsistent: {episodes} episodes but {embeddings} embeddings")]
    IndexInconsistency { episodes: usize, embeddings: usize },

    #[error("vector index error: {0}")]
    Index(String),

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RecallError>;

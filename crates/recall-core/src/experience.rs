use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single perceived unit held in working memory.
///
/// Experiences are transient: created when raw text is ingested, rescored and
/// reinforced while they live in the buffer, and discarded on eviction. They
/// are never persisted — durable records are episodes in the long-term store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Input modality. Only "text" is produced today.
    pub modality: String,
    pub content: String,
    /// Importance score in [0, 1]. Set on ingest from a novelty heuristic,
    /// raised by reinforcement and decayed by disuse.
    pub saliency: f64,
}

impl Experience {
    /// Create a text experience stamped with the current time.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            modality: "text".to_string(),
            content: text.into(),
            saliency: 0.5,
        }
    }

    /// The compact record handed to the downstream reasoning stage.
    pub fn summary(&self) -> ExperienceSummary {
        ExperienceSummary {
            id: self.id,
            content: self.content.clone(),
            saliency: (self.saliency * 1000.0).round() / 1000.0,
        }
    }
}

/// What the reasoning stage sees of an experience: id, content, and saliency
/// rounded to three decimals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceSummary {
    pub id: Uuid,
    pub content: String,
    pub saliency: f64,
}

/// Structured rationale attached to a recorded episode.
///
/// Opaque to the memory core: the rationale feeds the canonical embedding
/// text and the whole record round-trips through persistence, but nothing
/// here interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thought {
    /// Reasoning mode that produced the response: "fast", "slow", or "mixed".
    pub mode: String,
    pub rationale: String,
    /// The response text the reasoning stage proposed.
    pub proposal: String,
}

impl Thought {
    pub fn new(
        mode: impl Into<String>,
        rationale: impl Into<String>,
        proposal: impl Into<String>,
    ) -> Self {
        Self {
            mode: mode.into(),
            rationale: rationale.into(),
            proposal: proposal.into(),
        }
    }
}

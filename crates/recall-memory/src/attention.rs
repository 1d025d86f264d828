use recall_core::{Experience, Result};

use crate::long_term::LongTermMemory;
use crate::working::WorkingMemory;

/// Composes the bounded spotlight handed to the reasoning stage for one turn.
#[derive(Debug, Default)]
pub struct AttentionSelector;

impl AttentionSelector {
    pub fn new() -> Self {
        Self
    }

    /// Spotlight for trivial turns: the top-`k` working-memory items,
    /// unchanged.
    pub fn select(&self, wm: &WorkingMemory, k: usize) -> Vec<Experience> {
        wm.topk(k)
    }

    /// Blend working memory with long-term retrieval.
    ///
    /// Roughly half of `k` comes from working memory's top items; the
    /// remainder is filled from long-term search results. Each retrieved
    /// episode becomes a synthetic experience whose content encodes the
    /// retrieval score and the recalled exchange, and whose saliency is
    /// derived from the score so it competes with native items in any
    /// downstream scoring. The result is truncated to `k`, never padded.
    pub async fn select_with_retrieval(
        &self,
        wm: &WorkingMemory,
        ltm: &LongTermMemory,
        query: &str,
        k: usize,
    ) -> Result<Vec<Experience>> {
        let mut spotlight = wm.topk((k / 2).max(2));
        let retrieved = ltm.search(query, k.max(2), None).await?;
        let room = k.saturating_sub(spotlight.len()).max(1);
        for (idx, score) in retrieved.into_iter().take(room) {
            let Some(episode) = ltm.episode(idx) else {
                continue;
            };
            let mut exp = Experience::from_text(format!(
                "LT:{score:.2} Q:{} A:{}",
                episode.query, episode.response
            ));
            exp.saliency = (0.4 + 0.6 * score as f64).min(1.0);
            spotlight.push(exp);
        }
        spotlight.truncate(k);
        Ok(spotlight)
    }
}

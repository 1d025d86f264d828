use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use recall_core::{LongTermConfig, RecallError, Result, Thought};
use recall_embed::Embedder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::index::{FlatIpIndex, IndexKind, VectorIndex, inner_product, rank_top_k};
use crate::persist;

/// A durable record of one full interaction.
///
/// Append-only: episodes are never updated or deleted. The embedding vector
/// lives in the store's parallel embedding log, not here — index *i* in both
/// always refers to the same episode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub timestamp: DateTime<Utc>,
    pub query: String,
    pub response: String,
    pub thought: Thought,
    pub tags: Vec<String>,
}

/// Long-term episodic memory: episode log, tag index, embedding log, and an
/// optional vector index, persisted as four artifacts under a storage
/// directory.
///
/// Owned by a single agent session. Callers needing shared access must wrap
/// the whole store in their own mutual exclusion; nothing here is locked
/// internally.
pub struct LongTermMemory {
    embedder: Arc<dyn Embedder>,
    index_kind: IndexKind,
    /// Materialized lazily, on the first event where the embedding dimension
    /// is known: the first recorded episode, or vectors loaded from disk.
    index: Option<Box<dyn VectorIndex>>,
    episodes: Vec<Episode>,
    embeddings: Vec<Vec<f32>>,
    tag_index: BTreeMap<String, Vec<usize>>,
    storage_dir: Option<PathBuf>,
}

impl LongTermMemory {
    pub fn new(embedder: Arc<dyn Embedder>, index_kind: IndexKind) -> Self {
        Self {
            embedder,
            index_kind,
            index: None,
            episodes: Vec::new(),
            embeddings: Vec::new(),
            tag_index: BTreeMap::new(),
            storage_dir: None,
        }
    }

    /// Build a store from configuration, loading any persisted state.
    pub fn from_config(config: &LongTermConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let kind = IndexKind::from_config(&config.index)?;
        let mut store = Self::new(embedder, kind);
        if let Some(dir) = &config.storage_dir {
            store = store.with_storage_dir(dir)?;
            store.load()?;
        }
        Ok(store)
    }

    /// Configure the storage directory, creating it if needed.
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        self.storage_dir = Some(dir);
        Ok(self)
    }

    /// The canonical text an episode is embedded under.
    ///
    /// The format is load-bearing: stored embeddings are only comparable to
    /// query embeddings produced under the same canonicalization, so changing
    /// it invalidates every persisted store.
    fn canonical_text(query: &str, response: &str, thought: &Thought) -> String {
        format!("Q: {query}\nA: {response}\nWhy: {}", thought.rationale)
    }

    /// Record one interaction. Returns the new episode's index.
    ///
    /// The embedding is computed before anything is appended: if the
    /// embedding capability fails, the store is left exactly as it was.
    pub async fn record_episode(
        &mut self,
        query: impl Into<String>,
        response: impl Into<String>,
        thought: Thought,
        tags: Vec<String>,
    ) -> Result<usize> {
        let query = query.into();
        let response = response.into();
        let text = Self::canonical_text(&query, &response, &thought);
        let embedding = self.embedder.embed(&text).await?;
        if let Some(first) = self.embeddings.first() {
            if first.len() != embedding.len() {
                return Err(RecallError::DimensionMismatch {
                    expected: first.len(),
                    got: embedding.len(),
                });
            }
        }

        if self.index.is_none() {
            self.index = self.index_kind.materialize(embedding.len());
        }
        if let Some(index) = self.index.as_mut() {
            index.add(&embedding)?;
        }

        let idx = self.episodes.len();
        self.episodes.push(Episode {
            timestamp: Utc::now(),
            query,
            response,
            thought,
            tags,
        });
        self.embeddings.push(embedding);
        for tag in &self.episodes[idx].tags {
            self.tag_index.entry(tag.clone()).or_default().push(idx);
        }
        debug!(index = idx, tags = ?self.episodes[idx].tags, "recorded episode");
        Ok(idx)
    }

    /// Search episodes by semantic similarity to `query`.
    ///
    /// Returns `(episode index, score)` pairs, descending by score. The
    /// vector index accelerates the ranking when present; otherwise every
    /// stored embedding is scored directly — both paths rank identically.
    ///
    /// `required_tags` filters the ranked list after the top-k cut: with a
    /// narrow tag set and a small `top_k` this can return fewer than `top_k`
    /// matches even though more tagged episodes exist.
    pub async fn search(
        &self,
        query: &str,
        top_k: usize,
        required_tags: Option<&[String]>,
    ) -> Result<Vec<(usize, f32)>> {
        if self.episodes.is_empty() {
            return Ok(Vec::new());
        }
        let q = self.embedder.embed(query).await?;
        let mut candidates = match &self.index {
            Some(index) => index.search(&q, top_k),
            None => rank_top_k(self.embeddings.iter().map(|e| inner_product(&q, e)), top_k),
        };
        if let Some(tags) = required_tags.filter(|t| !t.is_empty()) {
            let allowed = self.indices_with_all_tags(tags);
            candidates.retain(|(i, _)| allowed.contains(i));
            if candidates.len() < top_k {
                debug!(
                    requested = top_k,
                    returned = candidates.len(),
                    ?tags,
                    "tag filter narrowed the ranked list"
                );
            }
        }
        Ok(candidates)
    }

    /// Episode indices bearing every one of `tags`.
    fn indices_with_all_tags(&self, tags: &[String]) -> HashSet<usize> {
        let mut sets = tags.iter().map(|t| {
            self.tag_index
                .get(t)
                .map(|v| v.iter().copied().collect::<HashSet<_>>())
                .unwrap_or_default()
        });
        let mut allowed = sets.next().unwrap_or_default();
        for set in sets {
            allowed.retain(|i| set.contains(i));
        }
        allowed
    }

    /// The last `k` episodes in log order.
    pub fn recent(&self, k: usize) -> &[Episode] {
        let start = self.episodes.len().saturating_sub(k);
        &self.episodes[start..]
    }

    pub fn episode(&self, index: usize) -> Option<&Episode> {
        self.episodes.get(index)
    }

    /// Resolve retrieval hits to episodes. Out-of-range indices are skipped.
    pub fn episodes_at(&self, indices: &[usize]) -> Vec<&Episode> {
        indices.iter().filter_map(|&i| self.episodes.get(i)).collect()
    }

    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }

    pub fn tag_index(&self) -> &BTreeMap<String, Vec<usize>> {
        &self.tag_index
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// Persist the store to the configured directory. Without one, this is a
    /// no-op.
    pub fn save(&self) -> Result<()> {
        let Some(dir) = self.storage_dir.clone() else {
            return Ok(());
        };
        self.save_to(&dir)
    }

    /// Persist the store to `dir` as four whole-file artifacts.
    pub fn save_to(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        persist::write_episodes(dir, &self.episodes)?;
        persist::write_embeddings(dir, &self.embeddings)?;
        if let Some(index) = &self.index {
            persist::write_index(dir, index.as_ref())?;
        }
        persist::write_tags(dir, &self.tag_index)?;
        info!(
            episodes = self.episodes.len(),
            dir = %dir.display(),
            "saved long-term memory"
        );
        Ok(())
    }

    /// Restore the store from the configured directory. Without one, this is
    /// a no-op.
    pub fn load(&mut self) -> Result<()> {
        let Some(dir) = self.storage_dir.clone() else {
            return Ok(());
        };
        self.load_from(&dir)
    }

    /// Restore the store from `dir`. A missing directory means an empty
    /// store, not an error; an episode/embedding length mismatch aborts the
    /// load.
    pub fn load_from(&mut self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            return Ok(());
        }
        let episodes = persist::read_episodes(dir)?;
        let embeddings = persist::read_embeddings(dir)?;
        if episodes.len() != embeddings.len() {
            return Err(RecallError::IndexInconsistency {
                episodes: episodes.len(),
                embeddings: embeddings.len(),
            });
        }
        let tag_index = persist::read_tags(dir)?;

        // The index must be usable before any new episode is recorded, so it
        // is materialized eagerly here: restored from the serialized artifact
        // when it matches the loaded vectors, rebuilt from them otherwise.
        let mut index = None;
        if self.index_kind == IndexKind::Flat && !embeddings.is_empty() {
            let dim = embeddings[0].len();
            index = match persist::read_index(dir)? {
                Some(loaded) if loaded.dim() == dim && loaded.len() == embeddings.len() => {
                    Some(Box::new(loaded) as Box<dyn VectorIndex>)
                }
                _ => {
                    let mut built = FlatIpIndex::new(dim);
                    for embedding in &embeddings {
                        built.add(embedding)?;
                    }
                    Some(Box::new(built) as Box<dyn VectorIndex>)
                }
            };
        }

        self.episodes = episodes;
        self.embeddings = embeddings;
        self.tag_index = tag_index;
        self.index = index;
        info!(
            episodes = self.episodes.len(),
            dir = %dir.display(),
            "loaded long-term memory"
        );
        Ok(())
    }
}

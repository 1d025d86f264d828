use std::collections::HashSet;

use chrono::{DateTime, Utc};
use recall_core::{Experience, WorkingConfig};
use uuid::Uuid;

/// Weight of explicit saliency in the effective score.
const SALIENCY_WEIGHT: f64 = 0.6;
/// Weight of recency decay in the effective score.
const RECENCY_WEIGHT: f64 = 0.4;
/// Recency decay time constant, in seconds.
const DECAY_TAU_SECONDS: f64 = 120.0;
/// Multiplicative decay applied to unselected items on reinforcement.
const DISUSE_DECAY: f64 = 0.98;
/// Saliency never decays below this.
const SALIENCY_FLOOR: f64 = 0.01;

/// Working memory — the bounded, decay-scored short-term buffer.
///
/// Holds at most `capacity` experiences in chronological order. Eviction
/// decisions rank by effective score (saliency blended with recency decay),
/// but the buffer's iteration order stays causal: after a trim the survivors
/// are re-sorted by timestamp.
pub struct WorkingMemory {
    capacity: usize,
    buffer: Vec<Experience>,
}

impl WorkingMemory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buffer: Vec::new(),
        }
    }

    pub fn from_config(config: &WorkingConfig) -> Self {
        Self::new(config.capacity)
    }

    /// Ingest an experience. Its initial saliency comes from a novelty
    /// heuristic: longer content starts more salient, bounded to [0.05, 1.0].
    pub fn add(&mut self, mut exp: Experience) {
        let novelty = (0.2 + exp.content.chars().count() as f64 / 200.0).min(1.0);
        exp.saliency = (0.5 * novelty).clamp(0.05, 1.0);
        self.buffer.push(exp);
        self.trim();
    }

    fn trim(&mut self) {
        if self.buffer.len() <= self.capacity {
            return;
        }
        let now = Utc::now();
        // Drop lowest effective score first
        self.buffer
            .sort_by(|a, b| score_at(a, now).total_cmp(&score_at(b, now)));
        let overflow = self.buffer.len() - self.capacity;
        self.buffer.drain(..overflow);
        // Preserve temporal order after trim
        self.buffer.sort_by_key(|e| e.timestamp);
        debug_assert!(self.buffer.len() <= self.capacity);
    }

    /// The runtime score used to rank buffer items: a convex blend of
    /// saliency and exponential recency decay. Recomputed on every call,
    /// never cached, since time advances between calls.
    pub fn effective_score(&self, exp: &Experience) -> f64 {
        score_at(exp, Utc::now())
    }

    /// The `k` highest-scoring experiences, best first. The buffer itself is
    /// left untouched.
    pub fn topk(&self, k: usize) -> Vec<Experience> {
        let now = Utc::now();
        let mut ranked = self.buffer.clone();
        ranked.sort_by(|a, b| score_at(b, now).total_cmp(&score_at(a, now)));
        ranked.truncate(k);
        ranked
    }

    /// Adjust saliency after a spotlight was used: selected items (matched by
    /// id) gain `delta` capped at 1.0, everything else decays multiplicatively
    /// toward the floor. Use it or lose it.
    pub fn reinforce(&mut self, selected: &[Experience], delta: f64) {
        let ids: HashSet<Uuid> = selected.iter().map(|e| e.id).collect();
        for exp in &mut self.buffer {
            if ids.contains(&exp.id) {
                exp.saliency = (exp.saliency + delta).min(1.0);
            } else {
                exp.saliency = (exp.saliency * DISUSE_DECAY).max(SALIENCY_FLOOR);
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Iterate the buffer in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &Experience> {
        self.buffer.iter()
    }
}

fn score_at(exp: &Experience, now: DateTime<Utc>) -> f64 {
    let age_s = ((now - exp.timestamp).num_milliseconds().max(0) as f64) / 1000.0;
    let recency = (-age_s / DECAY_TAU_SECONDS).exp();
    SALIENCY_WEIGHT * exp.saliency + RECENCY_WEIGHT * recency
}

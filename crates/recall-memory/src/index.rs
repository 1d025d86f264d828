use recall_core::{RecallError, Result};

use crate::persist;

/// Nearest-neighbor search over stored vectors, by inner product.
///
/// The index is an acceleration structure only: on the same vectors it must
/// produce the same ranking as brute-force scoring over the embedding log.
/// Entries are append-only, and entry *i* always corresponds to episode *i*.
pub trait VectorIndex: Send + Sync {
    /// Dimensionality of indexed vectors.
    fn dim(&self) -> usize;

    /// Number of vectors in the index.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a vector.
    fn add(&mut self, vector: &[f32]) -> Result<()>;

    /// The `k` nearest vectors by inner product, descending. Ties resolve to
    /// the lower index.
    fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)>;

    /// Opaque serialized form for persistence.
    fn to_bytes(&self) -> Result<Vec<u8>>;
}

/// Which acceleration structure a store uses, chosen at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Exact flat inner-product index.
    Flat,
    /// No index; search falls back to brute-force scoring.
    None,
}

impl IndexKind {
    /// Parse the config string ("flat" | "none").
    pub fn from_config(value: &str) -> Result<Self> {
        match value {
            "flat" => Ok(IndexKind::Flat),
            "none" => Ok(IndexKind::None),
            other => Err(RecallError::Config(format!(
                "unknown index kind {other:?}"
            ))),
        }
    }

    /// Materialize an index for the given dimension, or `None` for the
    /// brute-force strategy. Called on the first event where the embedding
    /// dimension is known.
    pub fn materialize(self, dim: usize) -> Option<Box<dyn VectorIndex>> {
        match self {
            IndexKind::Flat => Some(Box::new(FlatIpIndex::new(dim))),
            IndexKind::None => None,
        }
    }
}

/// Exact flat inner-product index: a dense row-major matrix scanned in full
/// on every query.
pub struct FlatIpIndex {
    dim: usize,
    data: Vec<f32>,
}

impl FlatIpIndex {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            data: Vec::new(),
        }
    }

    /// Restore an index serialized with [`VectorIndex::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (_count, dim, data) = persist::decode_matrix(bytes)?;
        Ok(Self { dim, data })
    }

    fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }
}

impl VectorIndex for FlatIpIndex {
    fn dim(&self) -> usize {
        self.dim
    }

    fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    fn add(&mut self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dim {
            return Err(RecallError::DimensionMismatch {
                expected: self.dim,
                got: vector.len(),
            });
        }
        self.data.extend_from_slice(vector);
        Ok(())
    }

    fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        if query.len() != self.dim {
            return Vec::new();
        }
        rank_top_k((0..self.len()).map(|i| inner_product(query, self.row(i))), k)
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(persist::encode_matrix(self.len(), self.dim, &self.data))
    }
}

pub(crate) fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Rank scores descending and keep the top `k`. Ties resolve to the lower
/// index, so indexed and brute-force search agree on the same data.
pub(crate) fn rank_top_k(scores: impl Iterator<Item = f32>, k: usize) -> Vec<(usize, f32)> {
    let mut scored: Vec<(usize, f32)> = scores.enumerate().collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    scored.truncate(k);
    scored
}

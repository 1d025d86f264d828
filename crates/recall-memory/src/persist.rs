//! Storage-directory artifacts for the long-term store.
//!
//! Four co-located files, each replaced wholesale on save:
//!
//! - `episodes.json` — scalar episode fields: timestamp, query, response,
//!   thought serialized to JSON text, tags comma-joined.
//! - `embeddings.bin` — N×D little-endian f32 matrix, row order == episode
//!   order.
//! - `index.bin` — serialized vector index, written when one is in use.
//! - `tags_index.json` — tag string → episode indices.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use recall_core::{RecallError, Result, Thought};
use serde::{Deserialize, Serialize};

use crate::index::{FlatIpIndex, VectorIndex};
use crate::long_term::Episode;

pub(crate) const EPISODES_FILE: &str = "episodes.json";
pub(crate) const EMBEDDINGS_FILE: &str = "embeddings.bin";
pub(crate) const INDEX_FILE: &str = "index.bin";
pub(crate) const TAGS_FILE: &str = "tags_index.json";

/// One scalar-field row of the episodes artifact.
#[derive(Debug, Serialize, Deserialize)]
struct EpisodeRow {
    ts: DateTime<Utc>,
    query: String,
    response: String,
    thought: String,
    tags: String,
}

pub(crate) fn write_episodes(dir: &Path, episodes: &[Episode]) -> Result<()> {
    let rows: Vec<EpisodeRow> = episodes
        .iter()
        .map(|e| {
            Ok(EpisodeRow {
                ts: e.timestamp,
                query: e.query.clone(),
                response: e.response.clone(),
                thought: serde_json::to_string(&e.thought)?,
                tags: e.tags.join(","),
            })
        })
        .collect::<Result<_>>()?;
    fs::write(dir.join(EPISODES_FILE), serde_json::to_vec_pretty(&rows)?)?;
    Ok(())
}

pub(crate) fn read_episodes(dir: &Path) -> Result<Vec<Episode>> {
    let path = dir.join(EPISODES_FILE);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = fs::read(&path)?;
    let rows: Vec<EpisodeRow> = serde_json::from_slice(&raw).map_err(|e| {
        RecallError::Persistence(format!("failed to parse {}: {}", path.display(), e))
    })?;
    rows.into_iter()
        .map(|row| {
            let thought: Thought = serde_json::from_str(&row.thought).map_err(|e| {
                RecallError::Persistence(format!("corrupt thought in {}: {}", path.display(), e))
            })?;
            let tags = if row.tags.is_empty() {
                Vec::new()
            } else {
                row.tags.split(',').map(String::from).collect()
            };
            Ok(Episode {
                timestamp: row.ts,
                query: row.query,
                response: row.response,
                thought,
                tags,
            })
        })
        .collect()
}

pub(crate) fn write_embeddings(dir: &Path, embeddings: &[Vec<f32>]) -> Result<()> {
    let dim = embeddings.first().map(|e| e.len()).unwrap_or(0);
    let mut data = Vec::with_capacity(embeddings.len() * dim);
    for row in embeddings {
        if row.len() != dim {
            return Err(RecallError::Persistence(format!(
                "ragged embedding log: expected dim {}, found {}",
                dim,
                row.len()
            )));
        }
        data.extend_from_slice(row);
    }
    fs::write(
        dir.join(EMBEDDINGS_FILE),
        encode_matrix(embeddings.len(), dim, &data),
    )?;
    Ok(())
}

pub(crate) fn read_embeddings(dir: &Path) -> Result<Vec<Vec<f32>>> {
    let path = dir.join(EMBEDDINGS_FILE);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let bytes = fs::read(&path)?;
    let (count, dim, data) = decode_matrix(&bytes)
        .map_err(|e| RecallError::Persistence(format!("{}: {}", path.display(), e)))?;
    if count > 0 && dim == 0 {
        return Err(RecallError::Persistence(format!(
            "{}: zero-dimension embedding rows",
            path.display()
        )));
    }
    Ok((0..count)
        .map(|i| data[i * dim..(i + 1) * dim].to_vec())
        .collect())
}

pub(crate) fn write_index(dir: &Path, index: &dyn VectorIndex) -> Result<()> {
    fs::write(dir.join(INDEX_FILE), index.to_bytes()?)?;
    Ok(())
}

pub(crate) fn read_index(dir: &Path) -> Result<Option<FlatIpIndex>> {
    let path = dir.join(INDEX_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(&path)?;
    let index = FlatIpIndex::from_bytes(&bytes)
        .map_err(|e| RecallError::Persistence(format!("{}: {}", path.display(), e)))?;
    Ok(Some(index))
}

pub(crate) fn write_tags(dir: &Path, tag_index: &BTreeMap<String, Vec<usize>>) -> Result<()> {
    fs::write(dir.join(TAGS_FILE), serde_json::to_vec_pretty(tag_index)?)?;
    Ok(())
}

pub(crate) fn read_tags(dir: &Path) -> Result<BTreeMap<String, Vec<usize>>> {
    let path = dir.join(TAGS_FILE);
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let raw = fs::read(&path)?;
    serde_json::from_slice(&raw).map_err(|e| {
        RecallError::Persistence(format!("failed to parse {}: {}", path.display(), e))
    })
}

/// Encode a row-major f32 matrix as a count/dim header plus little-endian
/// values.
pub(crate) fn encode_matrix(count: usize, dim: usize, data: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(16 + data.len() * 4);
    bytes.extend_from_slice(&(count as u64).to_le_bytes());
    bytes.extend_from_slice(&(dim as u64).to_le_bytes());
    for value in data {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

pub(crate) fn decode_matrix(bytes: &[u8]) -> Result<(usize, usize, Vec<f32>)> {
    if bytes.len() < 16 {
        return Err(RecallError::Persistence(
            "matrix header truncated".to_string(),
        ));
    }
    let mut header = [0u8; 8];
    header.copy_from_slice(&bytes[0..8]);
    let count = u64::from_le_bytes(header) as usize;
    header.copy_from_slice(&bytes[8..16]);
    let dim = u64::from_le_bytes(header) as usize;

    let body = &bytes[16..];
    let expected = count.checked_mul(dim).and_then(|n| n.checked_mul(4));
    if expected != Some(body.len()) {
        return Err(RecallError::Persistence(format!(
            "matrix body is {} bytes, expected {count} x {dim} f32 values",
            body.len()
        )));
    }
    let data = body
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    Ok((count, dim, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_roundtrip() {
        let data = [0.5f32, -1.25, 3.0, 0.0, 7.5, -0.001];
        let bytes = encode_matrix(2, 3, &data);
        let (count, dim, restored) = decode_matrix(&bytes).unwrap();
        assert_eq!(count, 2);
        assert_eq!(dim, 3);
        assert_eq!(restored, data);
    }

    #[test]
    fn test_matrix_empty() {
        let bytes = encode_matrix(0, 0, &[]);
        let (count, dim, data) = decode_matrix(&bytes).unwrap();
        assert_eq!((count, dim), (0, 0));
        assert!(data.is_empty());
    }

    #[test]
    fn test_decode_rejects_truncated_header() {
        assert!(decode_matrix(&[0u8; 7]).is_err());
    }

    #[test]
    fn test_decode_rejects_short_body() {
        let mut bytes = encode_matrix(2, 3, &[0.0; 6]);
        bytes.truncate(bytes.len() - 4);
        assert!(decode_matrix(&bytes).is_err());
    }
}

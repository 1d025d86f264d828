//! Configuration system for recall (`recall.toml`).
//!
//! Each agent session owns its own [`MemoryConfig`] instance — configuration
//! is ordinary owned state, never a process-wide global.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{RecallError, Result};

/// Configuration for one session's memory hierarchy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub working: WorkingConfig,
    pub long_term: LongTermConfig,
    pub embedder: EmbedderConfig,
}

/// Working-memory buffer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkingConfig {
    /// Maximum number of experiences held in the buffer.
    pub capacity: usize,
    /// Saliency boost applied to items selected into the spotlight.
    pub reinforce_delta: f64,
}

impl Default for WorkingConfig {
    fn default() -> Self {
        Self {
            capacity: 8,
            reinforce_delta: 0.1,
        }
    }
}

/// Long-term store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LongTermConfig {
    /// Directory holding the persisted artifacts. None disables persistence.
    pub storage_dir: Option<PathBuf>,
    /// Acceleration structure for search: "flat" for the exact inner-product
    /// index, "none" for brute-force scoring over the embedding log.
    pub index: String,
}

impl Default for LongTermConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            index: "flat".to_string(),
        }
    }
}

/// Embedding capability settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedderConfig {
    /// Provider backend: "hash", "openai", or "ollama".
    pub provider: String,
    /// Model name for remote providers.
    pub model: Option<String>,
    /// API key for remote providers. Falls back to OPENAI_API_KEY.
    pub api_key: Option<String>,
    /// Base URL override for remote providers.
    pub base_url: Option<String>,
    /// Output dimension for the hash provider.
    pub dimensions: usize,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            provider: "hash".to_string(),
            model: None,
            api_key: None,
            base_url: None,
            dimensions: 384,
        }
    }
}

impl MemoryConfig {
    /// Resolve the config path: explicit path > RECALL_CONFIG env > ./recall.toml
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var("RECALL_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from("recall.toml")
    }

    /// Load the config from disk, falling back to defaults when the file is
    /// absent. Environment overrides are applied afterwards.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = Self::resolve_path(path);
        let config = if config_path.exists() {
            info!(?config_path, "loading configuration");
            let raw = std::fs::read_to_string(&config_path)?;
            Self::from_toml_str(&raw).map_err(|e| {
                RecallError::Config(format!("failed to parse {}: {}", config_path.display(), e))
            })?
        } else {
            warn!(?config_path, "config file not found, using defaults");
            Self::default()
        };

        let config = Self::apply_env_overrides(config);
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from TOML text.
    pub fn from_toml_str(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Apply env var overrides (RECALL_STORAGE_DIR, RECALL_WM_CAPACITY, etc.)
    fn apply_env_overrides(mut config: Self) -> Self {
        if let Ok(v) = std::env::var("RECALL_STORAGE_DIR") {
            config.long_term.storage_dir = Some(PathBuf::from(v));
        }
        if let Ok(v) = std::env::var("RECALL_WM_CAPACITY") {
            if let Ok(capacity) = v.parse::<usize>() {
                config.working.capacity = capacity;
            }
        }
        if let Ok(v) = std::env::var("RECALL_EMBED_PROVIDER") {
            config.embedder.provider = v;
        }
        // API key: config file takes priority, env is the fallback.
        if config.embedder.api_key.is_none() {
            if let Ok(v) = std::env::var("OPENAI_API_KEY") {
                config.embedder.api_key = Some(v);
            }
        }
        config
    }

    /// Reject configurations the memory hierarchy cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.working.capacity == 0 {
            return Err(RecallError::Config(
                "working.capacity must be at least 1".to_string(),
            ));
        }
        if !matches!(self.long_term.index.as_str(), "flat" | "none") {
            return Err(RecallError::Config(format!(
                "long_term.index must be \"flat\" or \"none\", got {:?}",
                self.long_term.index
            )));
        }
        if !matches!(self.embedder.provider.as_str(), "hash" | "openai" | "ollama") {
            return Err(RecallError::Config(format!(
                "unknown embedder provider {:?}",
                self.embedder.provider
            )));
        }
        if self.embedder.provider == "hash" && self.embedder.dimensions == 0 {
            return Err(RecallError::Config(
                "embedder.dimensions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

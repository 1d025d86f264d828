//! # recall-core
//!
//! Core types for the recall memory hierarchy. This crate defines the shared
//! vocabulary used by every other crate in the workspace: the experience and
//! thought records that flow between the tiers, the unified error type, and
//! the per-session configuration.

pub mod config;
pub mod error;
pub mod experience;

pub use config::{EmbedderConfig, LongTermConfig, MemoryConfig, WorkingConfig};
pub use error::{RecallError, Result};
pub use experience::{Experience, ExperienceSummary, Thought};

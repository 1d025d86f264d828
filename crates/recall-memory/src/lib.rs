//! # recall-memory
//!
//! Two-tier memory hierarchy for a conversational agent:
//!
//! - **Working memory**: a bounded, decay-scored short-term buffer
//!   (in-memory, ephemeral).
//! - **Long-term memory**: a durable episodic store with tag and vector
//!   search, persisted under a storage directory.
//! - **Attention selector**: blends both tiers into the bounded "spotlight"
//!   handed to the reasoning stage.
//!
//! Control flow: new text becomes an [`Experience`](recall_core::Experience)
//! and enters working memory; the attention selector blends top
//! working-memory items with long-term retrieval into a spotlight; the
//! reasoning stage records its produced response back as an [`Episode`],
//! which reinforces the contributing working-memory items.
//!
//! ```no_run
//! use std::sync::Arc;
//! use recall_core::{Experience, Thought};
//! use recall_embed::HashEmbedder;
//! use recall_memory::{AttentionSelector, IndexKind, LongTermMemory, WorkingMemory};
//!
//! # async fn turn() -> recall_core::Result<()> {
//! let mut wm = WorkingMemory::new(8);
//! let mut ltm = LongTermMemory::new(Arc::new(HashEmbedder::new(384)), IndexKind::Flat);
//!
//! wm.add(Experience::from_text("what is 2+2?"));
//! let spotlight = AttentionSelector::new()
//!     .select_with_retrieval(&wm, &ltm, "what is 2+2?", 4)
//!     .await?;
//!
//! // ... the reasoning stage consumes the spotlight and produces a response ...
//!
//! ltm.record_episode(
//!     "what is 2+2?",
//!     "4",
//!     Thought::new("fast", "basic arithmetic", "4"),
//!     vec!["math".to_string()],
//! )
//! .await?;
//! wm.reinforce(&spotlight, 0.1);
//! ltm.save()?;
//! # Ok(())
//! # }
//! ```

pub mod attention;
pub mod index;
pub mod long_term;
mod persist;
pub mod working;

pub use attention::AttentionSelector;
pub use index::{FlatIpIndex, IndexKind, VectorIndex};
pub use long_term::{Episode, LongTermMemory};
pub use working::WorkingMemory;

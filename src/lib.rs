//! # Topic State
//!
//! Rebuilds the current state of a topic by replaying its message log.
//!
//! ## Core Concepts
//!
//! - **Records**: open-ended JSON objects keyed by a primary-key field
//! - **Actions**: each message is tagged `created`, `updated` or `deleted`
//! - **State**: the ordered records left after folding the log in order
//! - **Predicates**: whether a record could be created, updated or removed
//!
//! ## Example
//!
//! ```ignore
//! use topic_state::{build_topic_state, FieldName, Record};
//!
//! let messages: Vec<Record> = serde_json::from_value(json!([
//!     {"id": "A", "action": "created", "v": 1},
//!     {"id": "A", "action": "updated", "v": 2},
//!     {"id": "A", "action": "deleted"}
//! ]))?;
//!
//! let state = build_topic_state(
//!     messages,
//!     &FieldName::new("id")?,
//!     &FieldName::new("action")?,
//! );
//! assert!(state.is_empty());
//! ```

pub mod codec;
pub mod dynamic;
pub mod error;
pub mod replay;
pub mod state;
pub mod types;

// Re-exports
pub use codec::{decode_messages, encode_state};
pub use error::{ReplayError, Result};
pub use replay::{build_topic_state, ReplayConfig, ReplayStats, TopicState};
pub use state::{create, is_creatable, is_removable, is_updatable, remove, update};
pub use types::*;

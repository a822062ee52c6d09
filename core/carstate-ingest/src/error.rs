//! Error types for the ingestion layer.
//!
//! None of these are fatal: every variant describes a message that was
//! dropped without touching the store.

use carstate_types::EntityId;
use thiserror::Error;

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Reasons a stream message is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// Topic is outside the prefix or lacks the entity/field segments.
    #[error("malformed topic {topic:?}: {reason}")]
    MalformedTopic { topic: String, reason: &'static str },

    /// Field name is not on the whitelist for the current access mode.
    #[error("field {field:?} not accepted for entity {entity}")]
    FieldNotAccepted { entity: EntityId, field: String },
}

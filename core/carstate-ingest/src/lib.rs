//! Ingestion engine for the carstate relay.
//!
//! Turns `(topic, payload)` pairs from the telemetry stream into updates of
//! the shared [`SnapshotStore`](carstate_store::SnapshotStore).
//!
//! ## Components
//!
//! - **Topic**: splits `<prefix><entity>/<field>[/...]` into its parts
//! - **Whitelist**: decides which field names are stored in the current
//!   access mode
//! - **Transform**: writes the primary field plus the derived fields
//!   (timestamp, unit conversion, state label, aliases)
//! - **Pipeline**: wires the above together, one instance per process
//!
//! # Example
//!
//! ```
//! use carstate_ingest::{AccessMode, IngestionPipeline, PipelineConfig};
//! use carstate_store::SnapshotStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(SnapshotStore::new());
//! let pipeline = IngestionPipeline::new(
//!     PipelineConfig {
//!         access: AccessMode::Anonymous,
//!         ..Default::default()
//!     },
//!     store,
//! );
//! assert_eq!(pipeline.subscription(), "teslamate/cars/#");
//! ```

mod error;
mod pipeline;
pub mod topic;
pub mod transform;
pub mod whitelist;

pub use error::{IngestError, IngestResult};
pub use pipeline::{Applied, Clock, IngestionPipeline, PipelineConfig, SystemClock};
pub use topic::{DEFAULT_TOPIC_PREFIX, ParsedTopic, TopicParser};
pub use transform::{FieldUpdate, TransformEngine, UnitConfig, car_state_label};
pub use whitelist::{AccessMode, FieldWhitelist};

//! Ingestion pipeline — one per process.
//!
//! `topic → whitelist → coercion → transform → store`. All stages before
//! the store are pure; the only synchronization point is the store's
//! per-entity lock, held while the transform runs.

use crate::topic::{DEFAULT_TOPIC_PREFIX, TopicParser};
use crate::transform::{FieldUpdate, TransformEngine, UnitConfig};
use crate::whitelist::{AccessMode, FieldWhitelist};
use crate::{IngestError, IngestResult};
use carstate_store::SnapshotStore;
use carstate_types::{EntityId, FieldValue};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, trace};

/// Source of the instant written to `Date`.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Configuration for the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Topic prefix, including the trailing `/`.
    pub topic_prefix: String,
    /// Decides which whitelist applies.
    pub access: AccessMode,
    /// Reporting units.
    pub units: UnitConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            topic_prefix: DEFAULT_TOPIC_PREFIX.to_string(),
            access: AccessMode::Anonymous,
            units: UnitConfig::default(),
        }
    }
}

/// Summary of an update that reached the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub entity: EntityId,
    pub field: String,
    pub value: FieldValue,
}

/// Feeds stream messages into a [`SnapshotStore`].
pub struct IngestionPipeline {
    topics: TopicParser,
    whitelist: FieldWhitelist,
    engine: TransformEngine,
    store: Arc<SnapshotStore>,
    clock: Arc<dyn Clock>,
}

impl IngestionPipeline {
    /// Creates a pipeline writing into `store`, stamping updates with the
    /// system clock.
    pub fn new(config: PipelineConfig, store: Arc<SnapshotStore>) -> Self {
        Self {
            topics: TopicParser::new(config.topic_prefix),
            whitelist: FieldWhitelist::new(config.access),
            engine: TransformEngine::new(config.units),
            store,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for `Date`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    pub fn access_mode(&self) -> AccessMode {
        self.whitelist.mode()
    }

    /// Topic filter to subscribe to.
    pub fn subscription(&self) -> String {
        self.topics.subscription()
    }

    /// Processes one message, reporting why it was dropped if it was.
    ///
    /// A dropped message never mutates the store.
    pub async fn process(&self, topic: &str, payload: &[u8]) -> IngestResult<Applied> {
        let parsed = self.topics.parse(topic)?;

        if !self.whitelist.accepts(parsed.field) {
            return Err(IngestError::FieldNotAccepted {
                entity: parsed.entity,
                field: parsed.field.to_string(),
            });
        }

        let raw = String::from_utf8_lossy(payload);
        let update = FieldUpdate {
            field: parsed.field,
            raw: &raw,
            value: FieldValue::from_payload(payload),
        };
        let engine = self.engine;
        let clock = &self.clock;

        // The clock is read under the entity lock so `Date` follows the
        // order in which updates are applied.
        self.store
            .update(
                &parsed.entity,
                || engine.initial_snapshot(),
                |snapshot| engine.apply(snapshot, &update, clock.now()),
            )
            .await;

        Ok(Applied {
            entity: parsed.entity,
            field: update.field.to_string(),
            value: update.value,
        })
    }

    /// Stream callback: processes one message and logs drops.
    pub async fn handle_message(&self, topic: &str, payload: &[u8]) {
        match self.process(topic, payload).await {
            Ok(applied) => trace!(
                "Updated {}/{} = {:?}",
                applied.entity, applied.field, applied.value
            ),
            Err(e) => debug!("Dropped message: {}", e),
        }
    }
}

impl std::fmt::Debug for IngestionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionPipeline")
            .field("topics", &self.topics)
            .field("whitelist", &self.whitelist.mode())
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

//! In-memory latest-value store for the carstate relay.
//!
//! Holds one [`Snapshot`] per [`EntityId`]. The store is purely in-memory and
//! rebuilt from the live stream; nothing is persisted.
//!
//! # Locking
//!
//! The store uses two levels of `RwLock`:
//! - an outer lock over the entity map, taken for writing only when a new
//!   entity is inserted;
//! - one lock per entity snapshot, taken for writing for the whole duration
//!   of a multi-field update.
//!
//! Readers clone the snapshot under the per-entity read lock, so they see
//! either all fields of an update or none of them. Updates to different
//! entities only contend on the outer read lock.

use carstate_types::{EntityId, Snapshot};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

type Slot = Arc<RwLock<Snapshot>>;

/// Process-wide map of entity snapshots.
///
/// Construct once and share via `Arc` between the ingestion pipeline (the
/// only writer) and the read API.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    entities: RwLock<HashMap<EntityId, Slot>>,
}

impl SnapshotStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `apply` to the snapshot of `entity` as one atomic update.
    ///
    /// If the entity has no snapshot yet, `init` builds the starting snapshot
    /// and the entity only becomes visible once `apply` has run on it.
    pub async fn update<F, R>(
        &self,
        entity: &EntityId,
        init: impl FnOnce() -> Snapshot,
        apply: F,
    ) -> R
    where
        F: FnOnce(&mut Snapshot) -> R,
    {
        let existing = self.entities.read().await.get(entity).cloned();

        let slot = match existing {
            Some(slot) => slot,
            None => {
                let mut entities = self.entities.write().await;
                match entities.get(entity) {
                    // Another writer inserted it between our two lock acquisitions.
                    Some(slot) => slot.clone(),
                    None => {
                        let mut snapshot = init();
                        let result = apply(&mut snapshot);
                        debug!("Tracking new entity {}", entity);
                        entities.insert(entity.clone(), Arc::new(RwLock::new(snapshot)));
                        return result;
                    }
                }
            }
        };

        let mut snapshot = slot.write().await;
        apply(&mut *snapshot)
    }

    /// Returns a copy of the entity's snapshot, or `None` if no update was
    /// ever received for it.
    pub async fn get(&self, entity: &str) -> Option<Snapshot> {
        let slot = self.entities.read().await.get(entity).cloned()?;
        let snapshot = slot.read().await;
        Some(snapshot.clone())
    }

    /// Returns true if the entity has a snapshot.
    pub async fn contains(&self, entity: &str) -> bool {
        self.entities.read().await.contains_key(entity)
    }

    /// Maps every entity that has a `display_name` to that name.
    pub async fn display_names(&self) -> BTreeMap<EntityId, String> {
        let mut names = BTreeMap::new();
        for (id, slot) in self.slots().await {
            if let Some(name) = slot.read().await.display_name() {
                names.insert(id, name);
            }
        }
        names
    }

    /// Returns a copy of every snapshot.
    pub async fn all(&self) -> BTreeMap<EntityId, Snapshot> {
        let mut all = BTreeMap::new();
        for (id, slot) in self.slots().await {
            let snapshot = slot.read().await.clone();
            all.insert(id, snapshot);
        }
        all
    }

    /// Number of tracked entities.
    pub async fn len(&self) -> usize {
        self.entities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entities.read().await.is_empty()
    }

    // Releases the map lock before any per-entity lock is awaited.
    async fn slots(&self) -> Vec<(EntityId, Slot)> {
        self.entities
            .read()
            .await
            .iter()
            .map(|(id, slot)| (id.clone(), slot.clone()))
            .collect()
    }
}

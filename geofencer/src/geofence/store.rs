//! Durable storage boundary for registered geofence definitions.
//!
//! The store records caller intent: a definition is written on every
//! `add_geofence` and deleted on every `remove_geofence`, independent of
//! whether the network submission has completed yet. A process that restarts
//! can re-register everything the store still holds.

use dashmap::DashMap;
use thiserror::Error;

use super::definition::GeofenceDefinition;

/// Errors that can occur while reading or writing the definition store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error from a disk-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure.
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Durable key/value record of geofence id → definition.
///
/// Implementations must be safe to call from multiple threads; the provider
/// writes to the store while holding its buffer locks.
pub trait DefinitionStore: Send + Sync {
    /// Persist a definition, replacing any previous record with the same id.
    fn put(&self, definition: &GeofenceDefinition) -> Result<(), StoreError>;

    /// Delete the record for the given id. Deleting an absent id is not an
    /// error.
    fn remove(&self, id: &str) -> Result<(), StoreError>;
}

/// In-process definition store backed by a concurrent map.
///
/// Suitable for hosts that handle durability elsewhere, and as the store
/// double in tests.
#[derive(Debug, Default)]
pub struct MemoryDefinitionStore {
    entries: DashMap<String, GeofenceDefinition>,
}

impl MemoryDefinitionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a stored definition by id.
    pub fn get(&self, id: &str) -> Option<GeofenceDefinition> {
        self.entries.get(id).map(|entry| entry.value().clone())
    }

    /// Whether a record exists for the given id.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of stored definitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DefinitionStore for MemoryDefinitionStore {
    fn put(&self, definition: &GeofenceDefinition) -> Result<(), StoreError> {
        self.entries
            .insert(definition.id().to_string(), definition.clone());
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.entries.remove(id);
        Ok(())
    }
}

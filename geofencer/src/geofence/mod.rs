//! Geofence definitions and the durable definition store.
//!
//! A [`GeofenceDefinition`] describes one watched boundary: a unique
//! identifier, a circular region, the transitions of interest, and optional
//! expiration/dwell parameters. Definitions are immutable once built.
//!
//! The [`DefinitionStore`] trait is the boundary to durable storage of
//! registered definitions, keyed by identifier. The provider writes through
//! to the store on every add/remove so that intent survives a crash before
//! the network round-trip completes.

mod definition;
mod store;

pub use definition::{
    DefinitionError, GeofenceBuilder, GeofenceDefinition, TRANSITION_DWELL, TRANSITION_ENTER,
    TRANSITION_EXIT,
};
pub use store::{DefinitionStore, MemoryDefinitionStore, StoreError};

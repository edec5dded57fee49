//! Geofence registration provider.
//!
//! [`GeofencingProvider`] is the connection-state-aware front of the crate:
//! it accepts add/remove requests at any time, buffers them while the session
//! is not connected, flushes the buffers as one batch per buffer when the
//! session connects, and applies the resolution protocol to submission
//! failures.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use geofencer::provider::GeofencingProvider;
//! use geofencer::geofence::MemoryDefinitionStore;
//!
//! let provider = Arc::new(GeofencingProvider::new(session, Arc::new(MemoryDefinitionStore::new()), None));
//! provider.init();
//!
//! // Safe before the connection completes; buffered until then.
//! provider.add_geofence(fence);
//! ```

mod registration;

pub use registration::GeofencingProvider;

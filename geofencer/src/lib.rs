//! Geofencer - client-side geofence registration for an external location service
//!
//! This library provides a connection-state-aware adapter for registering and
//! deregistering geographic boundary ("geofence") watch requests against an
//! external location service, and for delivering transition events
//! (enter/exit/dwell) back to application code.
//!
//! The location service is reached through a session that must first establish
//! a connection. The central piece here is the
//! [`provider::GeofencingProvider`], which accepts add/remove requests at any
//! time (including before a connection exists), buffers them safely under
//! concurrent access, and flushes them as one batch once the session connects.

pub mod coord;
pub mod geofence;
pub mod provider;
pub mod relay;
pub mod session;

//! Transition event relay.
//!
//! The external service delivers raw [`GeofencingEvent`]s to this process's
//! background handler through a [`DeliveryTarget`]. The handler republishes
//! error-free events as [`TransitionBroadcast`]s, and the [`EventRelay`]
//! decodes each broadcast and forwards the `(geofences, transition,
//! location)` triple, unmodified and in delivery order, to the single
//! registered [`TransitionListener`].
//!
//! # Example
//!
//! ```ignore
//! use geofencer::relay::{self, EventRelay};
//!
//! let relay = Arc::new(EventRelay::new());
//! relay.register();
//! let (target, rx) = relay::channel();
//! let pump = relay::spawn_background_handler(rx, Arc::clone(&relay), cancellation);
//!
//! // hand `target` to the session; listeners now receive transitions
//! ```

mod event;
mod handler;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

pub use event::{
    GeofencingEvent, TransitionBroadcast, TransitionEvent, TransitionPayload, TRANSITION_ACTION,
};
pub use handler::{channel, spawn_background_handler, BackgroundHandler, DeliveryTarget};

/// Receiver of geofence transition events.
pub trait TransitionListener: Send + Sync {
    /// Handle one transition. Called in broadcast delivery order.
    fn on_transition(&self, event: TransitionEvent);
}

/// Decodes transition broadcasts and forwards them to the registered
/// listener.
///
/// Holds a single listener slot rather than a broadcast mechanism: the
/// provider subscribes one listener via `start` and clears it via `stop`.
/// The registered flag models receiver registration; an unregistered relay
/// drops broadcasts, and unregistering twice is benign.
pub struct EventRelay {
    listener: Mutex<Option<Arc<dyn TransitionListener>>>,
    registered: AtomicBool,
}

impl EventRelay {
    /// Create a relay with no listener, not yet registered.
    pub fn new() -> Self {
        Self {
            listener: Mutex::new(None),
            registered: AtomicBool::new(false),
        }
    }

    /// Register the relay for broadcasts.
    pub fn register(&self) {
        self.registered.store(true, Ordering::SeqCst);
    }

    /// Unregister the relay. Returns whether it was registered, so callers
    /// can log redundant teardown without treating it as an error.
    pub fn unregister(&self) -> bool {
        self.registered.swap(false, Ordering::SeqCst)
    }

    /// Whether the relay is currently registered for broadcasts.
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }

    /// Install the listener, replacing any previous one.
    pub fn set_listener(&self, listener: Arc<dyn TransitionListener>) {
        *self.listener.lock() = Some(listener);
    }

    /// Clear the listener slot.
    pub fn clear_listener(&self) {
        *self.listener.lock() = None;
    }

    /// Handle one broadcast: verify the action and payload shape, decode,
    /// and forward to the listener if one is registered.
    pub fn handle(&self, broadcast: &TransitionBroadcast) {
        if !self.is_registered() {
            return;
        }
        if broadcast.action != TRANSITION_ACTION || !broadcast.has_geofences() {
            return;
        }

        debug!("Geofencing event received");
        let payload = match broadcast.decode() {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Dropping malformed transition broadcast");
                return;
            }
        };

        let listener = self.listener.lock().clone();
        if let Some(listener) = listener {
            listener.on_transition(payload.into());
        }
    }
}

impl Default for EventRelay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Location;
    use crate::geofence::{TRANSITION_ENTER, TRANSITION_EXIT};

    /// Listener that records every delivered event.
    struct RecordingListener {
        events: Mutex<Vec<TransitionEvent>>,
    }

    impl RecordingListener {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                events: Mutex::new(Vec::new()),
            })
        }

        fn events(&self) -> Vec<TransitionEvent> {
            self.events.lock().clone()
        }
    }

    impl TransitionListener for RecordingListener {
        fn on_transition(&self, event: TransitionEvent) {
            self.events.lock().push(event);
        }
    }

    fn broadcast(ids: &[&str], transition: u8) -> TransitionBroadcast {
        TransitionBroadcast::from_event(&GeofencingEvent {
            transition,
            triggering_ids: ids.iter().map(|s| s.to_string()).collect(),
            triggering_location: Location::new(53.5511, 9.9937),
            error_code: None,
        })
    }

    #[test]
    fn test_forwards_triple_unmodified() {
        let relay = EventRelay::new();
        relay.register();
        let listener = RecordingListener::new();
        relay.set_listener(Arc::clone(&listener) as Arc<dyn TransitionListener>);

        relay.handle(&broadcast(&["geo1", "geo2"], TRANSITION_ENTER));

        let events = listener.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].geofences, vec!["geo1", "geo2"]);
        assert_eq!(events[0].transition, TRANSITION_ENTER);
        assert_eq!(events[0].location, Location::new(53.5511, 9.9937));
    }

    #[test]
    fn test_preserves_delivery_order() {
        let relay = EventRelay::new();
        relay.register();
        let listener = RecordingListener::new();
        relay.set_listener(Arc::clone(&listener) as Arc<dyn TransitionListener>);

        relay.handle(&broadcast(&["geo1"], TRANSITION_ENTER));
        relay.handle(&broadcast(&["geo2"], TRANSITION_EXIT));
        relay.handle(&broadcast(&["geo3"], TRANSITION_ENTER));

        let ids: Vec<String> = listener
            .events()
            .into_iter()
            .flat_map(|e| e.geofences)
            .collect();
        assert_eq!(ids, vec!["geo1", "geo2", "geo3"]);
    }

    #[test]
    fn test_unregistered_relay_drops_broadcasts() {
        let relay = EventRelay::new();
        let listener = RecordingListener::new();
        relay.set_listener(Arc::clone(&listener) as Arc<dyn TransitionListener>);

        relay.handle(&broadcast(&["geo1"], TRANSITION_ENTER));
        assert!(listener.events().is_empty());
    }

    #[test]
    fn test_wrong_action_ignored() {
        let relay = EventRelay::new();
        relay.register();
        let listener = RecordingListener::new();
        relay.set_listener(Arc::clone(&listener) as Arc<dyn TransitionListener>);

        let mut other = broadcast(&["geo1"], TRANSITION_ENTER);
        other.action = "other.BROADCAST".to_string();
        relay.handle(&other);

        assert!(listener.events().is_empty());
    }

    #[test]
    fn test_missing_geofences_field_ignored() {
        let relay = EventRelay::new();
        relay.register();
        let listener = RecordingListener::new();
        relay.set_listener(Arc::clone(&listener) as Arc<dyn TransitionListener>);

        let stray = TransitionBroadcast {
            action: TRANSITION_ACTION.to_string(),
            payload: serde_json::json!({ "transition": 1 }),
        };
        relay.handle(&stray);

        assert!(listener.events().is_empty());
    }

    #[test]
    fn test_no_listener_is_benign() {
        let relay = EventRelay::new();
        relay.register();
        relay.handle(&broadcast(&["geo1"], TRANSITION_ENTER));
    }

    #[test]
    fn test_unregister_reports_prior_state() {
        let relay = EventRelay::new();
        relay.register();
        assert!(relay.unregister());
        assert!(!relay.unregister());
    }
}

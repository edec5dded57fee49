//! Transition event types and the broadcast wire format.

use serde::{Deserialize, Serialize};

use crate::coord::Location;

/// Action string identifying a geofence transition broadcast.
pub const TRANSITION_ACTION: &str = "geofencer.GEOFENCE_TRANSITION";

/// Raw transition event as delivered by the external location service to the
/// background handler.
#[derive(Debug, Clone)]
pub struct GeofencingEvent {
    /// Transition code (one of the `TRANSITION_*` flags).
    pub transition: u8,
    /// Identifiers of the geofences that triggered.
    pub triggering_ids: Vec<String>,
    /// Location that triggered the transition.
    pub triggering_location: Location,
    /// Service error code; events carrying one are dropped.
    pub error_code: Option<i32>,
}

impl GeofencingEvent {
    /// Whether the service flagged this event as an error.
    pub fn has_error(&self) -> bool {
        self.error_code.is_some()
    }
}

/// Broadcast payload fields, named to match the wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionPayload {
    /// Transition code.
    pub transition: u8,
    /// Triggering geofence identifiers.
    pub geofences: Vec<String>,
    /// Triggering location.
    pub location: Location,
}

/// A local broadcast republished by the background handler.
///
/// The payload is kept as loose JSON until the relay has verified the action
/// string and the presence of the `geofences` field; broadcasts from other
/// publishers share the same bus.
#[derive(Debug, Clone)]
pub struct TransitionBroadcast {
    /// Action string; the relay only handles [`TRANSITION_ACTION`].
    pub action: String,
    /// JSON payload with `transition`, `geofences`, and `location` fields.
    pub payload: serde_json::Value,
}

impl TransitionBroadcast {
    /// Build a broadcast from an error-free service event.
    pub fn from_event(event: &GeofencingEvent) -> Self {
        let payload = TransitionPayload {
            transition: event.transition,
            geofences: event.triggering_ids.clone(),
            location: event.triggering_location,
        };
        Self {
            action: TRANSITION_ACTION.to_string(),
            // TransitionPayload serializes to a JSON object infallibly.
            payload: serde_json::to_value(payload).unwrap_or(serde_json::Value::Null),
        }
    }

    /// Whether the payload carries the `geofences` field.
    pub fn has_geofences(&self) -> bool {
        self.payload.get("geofences").is_some()
    }

    /// Decode the payload back into a [`TransitionPayload`].
    pub fn decode(&self) -> Result<TransitionPayload, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

/// A transition delivered to the registered listener: the triggering
/// identifiers, the transition type, and the triggering location, unmodified
/// from the broadcast.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionEvent {
    /// Identifiers of the geofences that triggered.
    pub geofences: Vec<String>,
    /// Transition code.
    pub transition: u8,
    /// Triggering location.
    pub location: Location,
}

impl From<TransitionPayload> for TransitionEvent {
    fn from(payload: TransitionPayload) -> Self {
        Self {
            geofences: payload.geofences,
            transition: payload.transition,
            location: payload.location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geofence::TRANSITION_ENTER;

    fn event() -> GeofencingEvent {
        GeofencingEvent {
            transition: TRANSITION_ENTER,
            triggering_ids: vec!["geo1".to_string(), "geo2".to_string()],
            triggering_location: Location::new(53.5511, 9.9937),
            error_code: None,
        }
    }

    #[test]
    fn test_has_error() {
        let mut ev = event();
        assert!(!ev.has_error());
        ev.error_code = Some(1000);
        assert!(ev.has_error());
    }

    #[test]
    fn test_broadcast_from_event() {
        let broadcast = TransitionBroadcast::from_event(&event());
        assert_eq!(broadcast.action, TRANSITION_ACTION);
        assert!(broadcast.has_geofences());

        let payload = broadcast.decode().unwrap();
        assert_eq!(payload.transition, TRANSITION_ENTER);
        assert_eq!(payload.geofences, vec!["geo1", "geo2"]);
        assert_eq!(payload.location, Location::new(53.5511, 9.9937));
    }

    #[test]
    fn test_payload_field_names() {
        let broadcast = TransitionBroadcast::from_event(&event());
        assert!(broadcast.payload.get("transition").is_some());
        assert!(broadcast.payload.get("geofences").is_some());
        assert!(broadcast.payload.get("location").is_some());
    }

    #[test]
    fn test_decode_malformed_payload_fails() {
        let broadcast = TransitionBroadcast {
            action: TRANSITION_ACTION.to_string(),
            payload: serde_json::json!({ "geofences": "not-a-list" }),
        };
        assert!(broadcast.decode().is_err());
    }

    #[test]
    fn test_transition_event_from_payload() {
        let payload = TransitionBroadcast::from_event(&event()).decode().unwrap();
        let transition: TransitionEvent = payload.into();
        assert_eq!(transition.geofences, vec!["geo1", "geo2"]);
        assert_eq!(transition.transition, TRANSITION_ENTER);
    }
}

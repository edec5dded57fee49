//! Background handler: the delivery path from the external service into the
//! relay.
//!
//! The session registers a [`DeliveryTarget`] with the external service when
//! submitting geofences; the service later delivers raw events through it.
//! [`spawn_background_handler`] runs the consume loop on a tokio task,
//! converting each error-free event into a broadcast and handing it to the
//! relay.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::event::{GeofencingEvent, TransitionBroadcast};
use super::EventRelay;

/// Durable callback target the external service delivers transition events
/// through. Clonable; outlives individual submissions.
#[derive(Debug, Clone)]
pub struct DeliveryTarget {
    tx: mpsc::UnboundedSender<GeofencingEvent>,
}

impl DeliveryTarget {
    /// Deliver one raw event to the background handler.
    pub fn deliver(&self, event: GeofencingEvent) {
        if self.tx.send(event).is_err() {
            warn!("Dropping transition event: background handler is gone");
        }
    }
}

/// Create a delivery target and the receiver end the background handler
/// consumes from.
pub fn channel() -> (DeliveryTarget, mpsc::UnboundedReceiver<GeofencingEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (DeliveryTarget { tx }, rx)
}

/// Converts raw service events into transition broadcasts for the relay.
pub struct BackgroundHandler {
    relay: Arc<EventRelay>,
}

impl BackgroundHandler {
    /// Create a handler that republishes into the given relay.
    pub fn new(relay: Arc<EventRelay>) -> Self {
        Self { relay }
    }

    /// Handle one raw event: drop it if the service flagged an error,
    /// otherwise broadcast it.
    pub fn handle_event(&self, event: GeofencingEvent) {
        if event.has_error() {
            debug!(error_code = ?event.error_code, "Dropping geofencing event with error");
            return;
        }
        self.relay.handle(&TransitionBroadcast::from_event(&event));
    }
}

/// Run the background handler loop on a tokio task until the channel closes
/// or the token is cancelled.
pub fn spawn_background_handler(
    mut rx: mpsc::UnboundedReceiver<GeofencingEvent>,
    relay: Arc<EventRelay>,
    cancellation: CancellationToken,
) -> JoinHandle<()> {
    let handler = BackgroundHandler::new(relay);
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancellation.cancelled() => {
                    debug!("Background handler cancelled");
                    break;
                }
                maybe_event = rx.recv() => match maybe_event {
                    Some(event) => handler.handle_event(event),
                    None => {
                        debug!("Delivery channel closed, background handler exiting");
                        break;
                    }
                },
            }
        }
    })
}

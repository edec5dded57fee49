//! Trait seams between the provider and a session driver.

use crate::geofence::GeofenceDefinition;
use crate::relay::DeliveryTarget;

use super::result::SubmissionResult;

/// Handle to the external location session.
///
/// `connect`/`disconnect` begin asynchronous transitions; completion is
/// reported through a [`ConnectionObserver`]. The submit calls are
/// fire-and-forget handoffs whose outcomes arrive via a [`ResultCallback`].
pub trait LocationSession: Send + Sync {
    /// Begin establishing a connection.
    fn connect(&self);

    /// Tear down the connection.
    fn disconnect(&self);

    /// Whether the session is currently connected, as the transport sees it.
    fn is_connected(&self) -> bool;

    /// Submit a batch of geofence additions. Transition events for these
    /// fences will be delivered through `target`.
    fn submit_add(&self, batch: Vec<GeofenceDefinition>, target: &DeliveryTarget);

    /// Submit a batch of geofence removals by identifier.
    fn submit_remove(&self, ids: Vec<String>);
}

/// Connection lifecycle callbacks, invoked by the session driver on its own
/// callback thread.
pub trait ConnectionObserver: Send + Sync {
    /// The session finished connecting. Fires at most once per
    /// establishment; may recur after the session reconnects.
    fn on_connected(&self);

    /// The connection dropped; the session is reconnecting on its own.
    fn on_connection_suspended(&self, reason: i32);

    /// The connection attempt failed.
    fn on_connection_failed(&self, reason: &str);
}

/// Receiver for the outcome of a batched submission.
pub trait ResultCallback: Send + Sync {
    /// Handle one submission outcome.
    fn on_result(&self, result: SubmissionResult);
}

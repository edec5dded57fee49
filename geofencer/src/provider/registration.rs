//! The connection-state-aware registration provider.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::geofence::{DefinitionStore, GeofenceDefinition};
use crate::relay::{
    self, DeliveryTarget, EventRelay, GeofencingEvent, TransitionListener,
};
use crate::session::{
    ConnectionObserver, ConnectionState, LocationSession, ResolutionHost, ResultCallback,
    SubmissionResult, RESULT_CODE,
};

/// Registers and deregisters geofence watch requests against the location
/// session, tolerating arbitrary call ordering relative to the asynchronous
/// connection lifecycle.
///
/// # Concurrency
///
/// `add_geofence` and `remove_geofence` may be called from any number of
/// threads, concurrently with the lifecycle callbacks the session driver
/// delivers on its own thread. Each pending buffer has its own lock covering
/// the full check-connected / submit-or-enqueue / clear sequence, so a
/// request is handed to the session exactly once: either directly (batched
/// with anything still buffered) or by the flush on the next connect. When
/// both buffers must be touched (an add superseding a queued removal of the
/// same id, or vice versa), locks are taken in a fixed order: add buffer
/// before remove buffer.
///
/// No call blocks on the network; submissions are asynchronous handoffs and
/// their outcomes arrive through [`ResultCallback`].
pub struct GeofencingProvider {
    session: Arc<dyn LocationSession>,
    store: Arc<dyn DefinitionStore>,
    resolution_host: Option<Arc<dyn ResolutionHost>>,
    relay: Arc<EventRelay>,

    /// Connection state, updated only inside the lifecycle handlers.
    state: Mutex<ConnectionState>,
    /// Definitions awaiting submission. Entries leave iff handed to the
    /// session in the same critical section.
    pending_adds: Mutex<Vec<GeofenceDefinition>>,
    /// Identifiers awaiting removal submission. Same invariant.
    pending_removes: Mutex<Vec<String>>,

    delivery: DeliveryTarget,
    events: Mutex<Option<mpsc::UnboundedReceiver<GeofencingEvent>>>,
}

impl GeofencingProvider {
    /// Create a provider around a session, a definition store, and an
    /// optional host for resolution flows. The provider starts disconnected
    /// with empty buffers; call [`init`](Self::init) to begin connecting.
    pub fn new(
        session: Arc<dyn LocationSession>,
        store: Arc<dyn DefinitionStore>,
        resolution_host: Option<Arc<dyn ResolutionHost>>,
    ) -> Self {
        let (delivery, events) = relay::channel();
        Self {
            session,
            store,
            resolution_host,
            relay: Arc::new(EventRelay::new()),
            state: Mutex::new(ConnectionState::Disconnected),
            pending_adds: Mutex::new(Vec::new()),
            pending_removes: Mutex::new(Vec::new()),
            delivery,
            events: Mutex::new(Some(events)),
        }
    }

    /// Register the transition receiver and begin connecting the session.
    ///
    /// The connection attempt is asynchronous; there is no guarantee it has
    /// completed (or even started transport work) when this returns. Requests
    /// made in the meantime are buffered.
    pub fn init(&self) {
        self.relay.register();
        *self.state.lock() = ConnectionState::Connecting;
        self.session.connect();
    }

    /// The relay this provider forwards transitions through. Hand this to
    /// [`relay::spawn_background_handler`] together with
    /// [`take_event_receiver`](Self::take_event_receiver).
    pub fn relay(&self) -> Arc<EventRelay> {
        Arc::clone(&self.relay)
    }

    /// Take the receiver end of the delivery channel. Yields `Some` once.
    pub fn take_event_receiver(&self) -> Option<mpsc::UnboundedReceiver<GeofencingEvent>> {
        self.events.lock().take()
    }

    /// The delivery target handed to the session on every add submission.
    pub fn delivery_target(&self) -> DeliveryTarget {
        self.delivery.clone()
    }

    /// Current connection state as tracked from lifecycle callbacks.
    pub fn connection_state(&self) -> ConnectionState {
        *self.state.lock()
    }

    /// Whether the session is connected, as tracked from lifecycle
    /// callbacks.
    pub fn is_connected(&self) -> bool {
        self.connection_state() == ConnectionState::Connected
    }

    /// Register a geofence watch request.
    ///
    /// The definition is persisted in the store unconditionally, so intent
    /// survives a crash before the network round-trip. If connected, the
    /// definition is submitted immediately, batched with anything still in
    /// the pending-add buffer; otherwise it is buffered until the next
    /// connect. Fire-and-forget: the outcome arrives via [`ResultCallback`].
    pub fn add_geofence(&self, definition: GeofenceDefinition) {
        let mut adds = self.pending_adds.lock();

        if let Err(e) = self.store.put(&definition) {
            warn!(id = definition.id(), error = %e, "Failed to persist geofence definition");
        }

        // This add supersedes any queued removal of the same id.
        self.pending_removes.lock().retain(|id| id != definition.id());

        if self.is_connected() {
            adds.retain(|pending| pending.id() != definition.id());
            let mut batch = Vec::with_capacity(adds.len() + 1);
            batch.push(definition);
            batch.append(&mut *adds);
            self.session.submit_add(batch, &self.delivery);
        } else {
            // Coalesce duplicates: the latest definition for an id wins.
            adds.retain(|pending| pending.id() != definition.id());
            adds.push(definition);
        }
    }

    /// Deregister a geofence watch request by identifier.
    ///
    /// The store record is deleted unconditionally. If connected, the
    /// removal is submitted immediately, batched with anything still in the
    /// pending-remove buffer; otherwise it is buffered until the next
    /// connect.
    pub fn remove_geofence(&self, id: &str) {
        // Lock order matches add_geofence: add buffer before remove buffer.
        self.pending_adds.lock().retain(|pending| pending.id() != id);

        let mut removes = self.pending_removes.lock();

        if let Err(e) = self.store.remove(id) {
            warn!(id, error = %e, "Failed to delete geofence definition from store");
        }

        if self.is_connected() {
            removes.retain(|pending| pending != id);
            let mut batch = Vec::with_capacity(removes.len() + 1);
            batch.push(id.to_string());
            batch.append(&mut *removes);
            self.session.submit_remove(batch);
        } else if !removes.iter().any(|pending| pending == id) {
            removes.push(id.to_string());
        }
    }

    /// Subscribe a listener for transition events.
    ///
    /// Registration itself is never queued; if the session is not yet
    /// connected, events simply start flowing once it is.
    pub fn start(&self, listener: Arc<dyn TransitionListener>) {
        self.relay.set_listener(listener);
        if !self.is_connected() {
            debug!("Still not connected - transitions will flow once the session connects");
        }
    }

    /// Disconnect the session and unregister the transition receiver.
    ///
    /// Idempotent: a second `stop` finds the receiver already unregistered
    /// and only logs. In-flight submissions are not retracted.
    pub fn stop(&self) {
        debug!("Stopping geofence registration provider");
        // Drop the state lock before calling into the session; drivers may
        // deliver lifecycle callbacks synchronously from disconnect().
        let was_connected = {
            let mut state = self.state.lock();
            if *state == ConnectionState::Connected {
                *state = ConnectionState::Disconnected;
                true
            } else {
                false
            }
        };
        if was_connected {
            self.session.disconnect();
        }
        if self.relay.unregister() {
            self.relay.clear_listener();
        } else {
            debug!("Transition receiver already unregistered (stop called more than once)");
        }
    }

    #[cfg(test)]
    pub(crate) fn force_connection_state(&self, state: ConnectionState) {
        *self.state.lock() = state;
    }

    #[cfg(test)]
    pub(crate) fn pending_counts(&self) -> (usize, usize) {
        (self.pending_adds.lock().len(), self.pending_removes.lock().len())
    }
}

impl ConnectionObserver for GeofencingProvider {
    /// Flush the buffers: the entire add buffer as one batch, then the
    /// entire remove buffer as one batch. Requests arriving after a flush
    /// drains its buffer go out via the immediate path instead.
    fn on_connected(&self) {
        debug!("Location session connected");
        *self.state.lock() = ConnectionState::Connected;

        {
            let mut adds = self.pending_adds.lock();
            if !adds.is_empty() {
                let batch = std::mem::take(&mut *adds);
                self.session.submit_add(batch, &self.delivery);
            }
        }
        {
            let mut removes = self.pending_removes.lock();
            if !removes.is_empty() {
                let batch = std::mem::take(&mut *removes);
                self.session.submit_remove(batch);
            }
        }
    }

    /// Buffers are untouched; the session reconnects on its own and the
    /// next `on_connected` retries everything still queued.
    fn on_connection_suspended(&self, reason: i32) {
        debug!(reason, "Location session connection suspended");
        *self.state.lock() = ConnectionState::Connecting;
    }

    fn on_connection_failed(&self, reason: &str) {
        warn!(reason, "Location session connection failed");
        *self.state.lock() = ConnectionState::Disconnected;
    }
}

impl ResultCallback for GeofencingProvider {
    fn on_result(&self, result: SubmissionResult) {
        match result {
            SubmissionResult::Success => {
                debug!("Geofencing update request successful");
            }
            SubmissionResult::Failure(failure) => {
                let host = self
                    .resolution_host
                    .as_ref()
                    .filter(|host| host.can_launch());
                match (failure.resolution(), host) {
                    (Some(resolution), Some(host)) => {
                        warn!(
                            result_code = RESULT_CODE,
                            "Unable to register, but the failure is resolvable - launching resolution (retry after the result arrives)"
                        );
                        if let Err(e) = resolution.launch(host.as_ref(), RESULT_CODE) {
                            error!(error = %e, "Problem launching the resolution flow");
                        }
                    }
                    _ => {
                        // No recovery; the caller must re-invoke to retry.
                        error!(message = failure.message(), "Registering failed");
                    }
                }
            }
        }
    }
}

//! Connection state of the location session, as tracked by the provider.

use std::fmt;

/// Connection state derived from session lifecycle callbacks.
///
/// The provider owns one of these and updates it only inside its lifecycle
/// handlers, so state transitions are unit-testable without a real session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection exists and none is being established.
    Disconnected,
    /// A connection attempt is in flight (initial connect, or the session
    /// reconnecting on its own after a suspension).
    Connecting,
    /// The session is connected; submissions go out immediately.
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
        }
    }
}

//! Location-session boundary: connection lifecycle, submission outcomes, and
//! the trait seams a session driver plugs into.
//!
//! The session itself (transport, reconnection, transition detection) is an
//! external collaborator. This module only fixes its contract:
//!
//! - [`LocationSession`] - connect/disconnect plus fire-and-forget batch
//!   submission of geofence additions and removals
//! - [`ConnectionObserver`] - lifecycle callbacks the session driver invokes
//!   on its own thread
//! - [`ResultCallback`] - out-of-band delivery of [`SubmissionResult`]s
//! - the resolution contract ([`Resolution`], [`ResolutionHost`]) for
//!   recoverable registration failures

mod result;
mod state;
mod traits;

pub use result::{
    Resolution, ResolutionError, ResolutionHost, SubmissionFailure, SubmissionResult, RESULT_CODE,
};
pub use state::ConnectionState;
pub use traits::{ConnectionObserver, LocationSession, ResultCallback};

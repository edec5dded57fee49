//! Submission outcomes and the resolution contract for recoverable failures.

use std::fmt;

use thiserror::Error;

/// Fixed sentinel result code the resolution flow is launched with. The host
/// watches for this code to know the user interaction belongs to geofence
/// registration.
pub const RESULT_CODE: i32 = 10003;

/// Errors raised while launching a resolution flow.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The resolution interaction could not be sent to the host.
    #[error("Resolution could not be sent: {0}")]
    SendFailed(String),
}

/// A host capable of presenting foreground user interactions.
///
/// The provider only launches a resolution when the host reports it can
/// currently present one (a backgrounded host cannot).
pub trait ResolutionHost: Send + Sync {
    /// Whether the host can currently launch a foreground interaction.
    fn can_launch(&self) -> bool;
}

/// A user-facing action that can resolve a recoverable submission failure,
/// such as a permission or settings prompt.
pub trait Resolution: Send + Sync {
    /// Launch the resolution flow on the given host. The host reports the
    /// outcome back under `result_code`; the caller is expected to retry the
    /// registration after a successful resolution.
    fn launch(&self, host: &dyn ResolutionHost, result_code: i32) -> Result<(), ResolutionError>;
}

/// A failed add/remove submission, with an optional resolution path.
pub struct SubmissionFailure {
    message: String,
    resolution: Option<Box<dyn Resolution>>,
}

impl SubmissionFailure {
    /// A failure with no resolution path.
    pub fn terminal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            resolution: None,
        }
    }

    /// A failure the user can resolve through a foreground interaction.
    pub fn recoverable(message: impl Into<String>, resolution: Box<dyn Resolution>) -> Self {
        Self {
            message: message.into(),
            resolution: Some(resolution),
        }
    }

    /// Human-readable failure message from the service.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether a resolution path exists.
    pub fn has_resolution(&self) -> bool {
        self.resolution.is_some()
    }

    /// The resolution path, if any.
    pub fn resolution(&self) -> Option<&dyn Resolution> {
        self.resolution.as_deref()
    }
}

impl fmt::Debug for SubmissionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionFailure")
            .field("message", &self.message)
            .field("has_resolution", &self.resolution.is_some())
            .finish()
    }
}

/// Outcome of one batched add/remove call to the external service, delivered
/// out-of-band via [`super::ResultCallback`].
#[derive(Debug)]
pub enum SubmissionResult {
    /// The batch was registered.
    Success,
    /// The batch was rejected; see [`SubmissionFailure`] for whether a
    /// resolution path exists.
    Failure(SubmissionFailure),
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopResolution;

    impl Resolution for NoopResolution {
        fn launch(
            &self,
            _host: &dyn ResolutionHost,
            _result_code: i32,
        ) -> Result<(), ResolutionError> {
            Ok(())
        }
    }

    #[test]
    fn test_terminal_failure_has_no_resolution() {
        let failure = SubmissionFailure::terminal("quota exceeded");
        assert_eq!(failure.message(), "quota exceeded");
        assert!(!failure.has_resolution());
        assert!(failure.resolution().is_none());
    }

    #[test]
    fn test_recoverable_failure_has_resolution() {
        let failure =
            SubmissionFailure::recoverable("location disabled", Box::new(NoopResolution));
        assert!(failure.has_resolution());
        assert!(failure.resolution().is_some());
    }

    #[test]
    fn test_debug_does_not_require_resolution_debug() {
        let failure =
            SubmissionFailure::recoverable("location disabled", Box::new(NoopResolution));
        let debug = format!("{:?}", failure);
        assert!(debug.contains("location disabled"));
        assert!(debug.contains("has_resolution: true"));
    }

    #[test]
    fn test_resolution_error_display() {
        let err = ResolutionError::SendFailed("host gone".to_string());
        assert!(err.to_string().contains("host gone"));
    }
}

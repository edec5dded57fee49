//! Geofence definition type and its builder.

use std::time::Duration;

use thiserror::Error;

use crate::coord::Location;

/// Transition flag: the device entered the geofenced region.
pub const TRANSITION_ENTER: u8 = 1;
/// Transition flag: the device exited the geofenced region.
pub const TRANSITION_EXIT: u8 = 2;
/// Transition flag: the device dwelled inside the region for the loitering
/// delay.
pub const TRANSITION_DWELL: u8 = 4;

/// Errors raised while building a [`GeofenceDefinition`].
#[derive(Debug, Error, PartialEq)]
pub enum DefinitionError {
    /// The identifier was empty.
    #[error("Geofence identifier must not be empty")]
    EmptyId,

    /// The radius was zero, negative, or not a number.
    #[error("Invalid radius: {0} (must be > 0)")]
    InvalidRadius(f64),

    /// The DWELL transition was requested without a loitering delay.
    #[error("Loitering delay is required when the DWELL transition is requested")]
    MissingLoiteringDelay,
}

/// A single geofence watch request.
///
/// Immutable once built; the provider and the definition store only ever
/// reference or clone it. Construct via [`GeofenceDefinition::builder`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use geofencer::coord::Location;
/// use geofencer::geofence::{GeofenceDefinition, TRANSITION_ENTER, TRANSITION_EXIT};
///
/// let fence = GeofenceDefinition::builder("office")
///     .center(Location::new(53.5511, 9.9937))
///     .radius_m(150.0)
///     .transitions(TRANSITION_ENTER | TRANSITION_EXIT)
///     .expiration(Duration::from_secs(3600))
///     .build()
///     .unwrap();
/// assert_eq!(fence.id(), "office");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GeofenceDefinition {
    /// Unique identifier, non-empty.
    id: String,
    /// Center of the circular region.
    center: Location,
    /// Radius in meters, > 0.
    radius_m: f64,
    /// Time until the service drops the fence; `None` means never.
    expiration: Option<Duration>,
    /// OR of the `TRANSITION_*` flags.
    transitions: u8,
    /// Dwell time before a DWELL transition fires.
    loitering_delay: Option<Duration>,
}

impl GeofenceDefinition {
    /// Start building a definition with the given identifier.
    pub fn builder(id: impl Into<String>) -> GeofenceBuilder {
        GeofenceBuilder::new(id)
    }

    /// Get the unique identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the center of the region.
    pub fn center(&self) -> Location {
        self.center
    }

    /// Get the radius in meters.
    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// Get the expiration, if any.
    pub fn expiration(&self) -> Option<Duration> {
        self.expiration
    }

    /// Get the transition mask (OR of the `TRANSITION_*` flags).
    pub fn transitions(&self) -> u8 {
        self.transitions
    }

    /// Get the loitering delay, if any.
    pub fn loitering_delay(&self) -> Option<Duration> {
        self.loitering_delay
    }
}

/// Builder for [`GeofenceDefinition`].
#[derive(Debug, Clone)]
pub struct GeofenceBuilder {
    id: String,
    center: Location,
    radius_m: f64,
    expiration: Option<Duration>,
    transitions: u8,
    loitering_delay: Option<Duration>,
}

impl GeofenceBuilder {
    fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            center: Location::new(0.0, 0.0),
            radius_m: 0.0,
            expiration: None,
            transitions: TRANSITION_ENTER | TRANSITION_EXIT,
            loitering_delay: None,
        }
    }

    /// Set the center of the region.
    pub fn center(mut self, center: Location) -> Self {
        self.center = center;
        self
    }

    /// Set the radius in meters.
    pub fn radius_m(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    /// Set the expiration. The default is to never expire.
    pub fn expiration(mut self, expiration: Duration) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Set the transition mask. Defaults to ENTER | EXIT.
    pub fn transitions(mut self, transitions: u8) -> Self {
        self.transitions = transitions;
        self
    }

    /// Set the loitering delay. Required when the DWELL flag is set.
    pub fn loitering_delay(mut self, delay: Duration) -> Self {
        self.loitering_delay = Some(delay);
        self
    }

    /// Validate and build the definition.
    pub fn build(self) -> Result<GeofenceDefinition, DefinitionError> {
        if self.id.is_empty() {
            return Err(DefinitionError::EmptyId);
        }
        if !(self.radius_m > 0.0) {
            return Err(DefinitionError::InvalidRadius(self.radius_m));
        }
        if self.transitions & TRANSITION_DWELL != 0 && self.loitering_delay.is_none() {
            return Err(DefinitionError::MissingLoiteringDelay);
        }

        Ok(GeofenceDefinition {
            id: self.id,
            center: self.center,
            radius_m: self.radius_m,
            expiration: self.expiration,
            transitions: self.transitions,
            loitering_delay: self.loitering_delay,
        })
    }
}

//! Geographic coordinate types shared across the crate.
//!
//! A [`Location`] is used both as the center of a geofence definition and as
//! the triggering location attached to a transition event, so it lives here
//! rather than in either module.

use serde::{Deserialize, Serialize};

/// A WGS84 latitude/longitude pair in decimal degrees.
///
/// # Example
///
/// ```
/// use geofencer::coord::Location;
///
/// let hamburg = Location::new(53.5511, 9.9937);
/// assert_eq!(hamburg.latitude(), 53.5511);
/// assert_eq!(hamburg.longitude(), 9.9937);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees (positive north).
    latitude: f64,
    /// Longitude in decimal degrees (positive east).
    longitude: f64,
}

impl Location {
    /// Create a new location.
    ///
    /// # Arguments
    ///
    /// * `latitude` - Decimal degrees, expected in [-90, 90]
    /// * `longitude` - Decimal degrees, expected in [-180, 180]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Get the latitude in decimal degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude in decimal degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

//! Locally linear longitude projection
//!
//! Longitude degrees shrink with latitude. Multiplying longitude by the
//! departure (cosine of the reference latitude) gives a frame where one unit
//! along either axis is roughly the same distance, so plain planar geometry
//! works for the few hundred meters an anchored boat moves.
//!
//! Near the antimeridian the Pacific variant folds eastern longitudes below
//! -180 before projecting so that 179.9 and -179.9 stay neighbours.

use serde::{Deserialize, Serialize};

use crate::core::Point;

/// Longitudes at or beyond this absolute value select the Pacific variant
pub const PACIFIC_THRESHOLD: f64 = 179.0;

/// Smallest departure accepted, keeps the pole from dividing by zero
const MIN_DEPARTURE: f64 = 1e-9;

/// Projection fixed at the first fix of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "camelCase")]
pub enum LocalLongitude {
    Standard { departure: f64 },
    Pacific { departure: f64 },
}

impl LocalLongitude {
    /// Picks the projection variant for a reference position
    pub fn new(longitude: f64, latitude: f64) -> Self {
        let departure = latitude.to_radians().cos().max(MIN_DEPARTURE);
        if longitude.abs() >= PACIFIC_THRESHOLD {
            LocalLongitude::Pacific { departure }
        } else {
            LocalLongitude::Standard { departure }
        }
    }

    pub fn departure(&self) -> f64 {
        match self {
            LocalLongitude::Standard { departure } | LocalLongitude::Pacific { departure } => *departure,
        }
    }

    pub fn is_pacific(&self) -> bool {
        matches!(self, LocalLongitude::Pacific { .. })
    }

    /// Real longitude to internal x
    pub fn to_internal(&self, longitude: f64) -> f64 {
        match self {
            LocalLongitude::Standard { departure } => longitude * departure,
            LocalLongitude::Pacific { departure } => {
                let folded = if longitude > 0.0 { longitude - 360.0 } else { longitude };
                folded * departure
            }
        }
    }

    /// Internal x back to real longitude
    pub fn to_external(&self, internal: f64) -> f64 {
        match self {
            LocalLongitude::Standard { departure } => internal / departure,
            LocalLongitude::Pacific { departure } => {
                let longitude = internal / departure;
                if longitude < -180.0 {
                    longitude + 360.0
                } else {
                    longitude
                }
            }
        }
    }

    pub fn to_internal_point(&self, longitude: f64, latitude: f64) -> Point {
        Point::new(self.to_internal(longitude), latitude)
    }

    /// Returns (longitude, latitude)
    pub fn to_external_point(&self, point: &Point) -> (f64, f64) {
        (self.to_external(point.x), point.y)
    }
}

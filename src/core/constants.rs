//! Unit conversions

/// Degrees of latitude per meter (one minute of latitude is one nautical mile)
pub const DEGREE_TO_METERS: f64 = 36.0 / 4_000_000.0;

/// Meters in one nautical mile
pub const METERS_PER_NAUTICAL_MILE: f64 = 1852.0;

/// One knot in meters per second
pub const KNOTS_TO_METERS_PER_SECOND: f64 = METERS_PER_NAUTICAL_MILE / 3600.0;

/// Converts a distance in (latitude) degrees to meters
pub fn to_meters(degrees: f64) -> f64 {
    degrees / DEGREE_TO_METERS
}

/// Converts meters to (latitude) degrees
pub fn to_degrees(meters: f64) -> f64 {
    meters * DEGREE_TO_METERS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meter_conversion() {
        assert!((to_meters(to_degrees(60.0)) - 60.0).abs() < 1e-9);
        // 10 000 km from equator to pole
        assert!((to_meters(90.0) - 10_000_000.0).abs() < 1e-3);
    }

    #[test]
    fn test_knots() {
        assert!((KNOTS_TO_METERS_PER_SECOND * 3600.0 - 1852.0).abs() < 1e-9);
    }
}

//! Core data types for the anchor watch

use serde::{Deserialize, Serialize};

/// Point (or vector) in the locally linear frame.
///
/// `x` is projected longitude, `y` is latitude, both in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Vector from `origin` to this point
    pub fn relative_to(&self, origin: &Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }

    /// Length when treated as a vector
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Z component of the cross product `self x other`.
    /// Negative when `other` is clockwise from `self`.
    pub fn cross(&self, other: &Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn is_clockwise_to(&self, other: &Point) -> bool {
        self.cross(other) < 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Signed turn of `a -> b -> c`, positive for counter-clockwise
pub fn turn(a: &Point, b: &Point, c: &Point) -> f64 {
    b.relative_to(a).cross(&c.relative_to(a))
}

/// Relative slack in the radius for points computed to lie on a circle
const BOUNDARY_EPSILON: f64 = 1e-9;

/// Circle in the locally linear frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn distance_from_center(&self, x: f64, y: f64) -> f64 {
        self.center.distance_to(&Point::new(x, y))
    }

    /// Boundary counts as inside, within rounding of the radius
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.distance_from_center(x, y) <= self.radius * (1.0 + BOUNDARY_EPSILON)
    }
}

/// Single GPS position update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    /// Degrees, [-180, 180]
    pub longitude: f64,
    /// Degrees, [-90, 90]
    pub latitude: f64,
    /// Milliseconds, any epoch
    pub time_ms: i64,
    /// Horizontal accuracy in meters
    #[serde(default)]
    pub accuracy: Option<f64>,
    /// Speed over ground in knots
    #[serde(default)]
    pub speed: Option<f64>,
}

impl Fix {
    pub fn new(longitude: f64, latitude: f64, time_ms: i64) -> Self {
        Self {
            longitude,
            latitude,
            time_ms,
            accuracy: None,
            speed: None,
        }
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_boundary_rounding() {
        let circle = Circle::new(Point::new(54.8123, 24.0001), 0.00036);
        let on_rim = |deg: f64| {
            let a = deg.to_radians();
            (54.8123 + 0.00036 * a.cos(), 24.0001 + 0.00036 * a.sin())
        };
        for step in 0..72 {
            let (x, y) = on_rim(step as f64 * 5.0);
            assert!(circle.contains(x, y), "rim point at {} degrees", step * 5);
        }
        assert!(!circle.contains(54.8123 + 0.00036 * (1.0 + 1e-6), 24.0001));
    }

    #[test]
    fn test_cross_orientation() {
        let east = Point::new(1.0, 0.0);
        let north = Point::new(0.0, 1.0);

        assert!(east.cross(&north) > 0.0);
        assert!(north.is_clockwise_to(&east));
        assert!(!east.is_clockwise_to(&north));
        assert!(turn(&Point::ZERO, &east, &Point::new(1.0, 1.0)) > 0.0);
    }

    #[test]
    fn test_circle_contains() {
        let circle = Circle::new(Point::new(1.0, 1.0), 2.0);

        assert!(circle.contains(1.0, 3.0));
        assert!(circle.contains(2.0, 2.0));
        assert!(!circle.contains(3.1, 1.0));
        assert!((circle.distance_from_center(4.0, 5.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_fix_builder() {
        let fix = Fix::new(24.0, 60.0, 1000).with_accuracy(3.0).with_speed(0.5);

        assert_eq!(fix.accuracy, Some(3.0));
        assert_eq!(fix.speed, Some(0.5));
    }
}

//! Safe zone around the anchor
//!
//! A circle, optionally cut to a wedge, plus an inner circle that is always
//! safe. The wedge is given by two vectors from the center, `right` and
//! `left`, and covers the directions met when turning counter-clockwise
//! from `right` to `left`. Equal (or zero length) vectors mean no cut.
//!
//! The circle is normally the fitted swing circle (attached). Moving the
//! center by hand detaches it; later fits still update the radius but the
//! center stays where it was put until it is attached again.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::algorithms::convex_polygon::distance_from_segment;
use crate::core::{Circle, Point};

/// Where the sector center comes from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum CenterSource {
    /// Follows the estimated circle
    Attached,
    /// Set manually
    Detached { point: Point },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeSector {
    estimate: Circle,
    center: CenterSource,
    inner_radius: f64,
    left: Point,
    right: Point,
}

impl SafeSector {
    /// Full circle sector attached to `estimate`, inner radius half of it
    pub fn new(estimate: Circle) -> Self {
        Self {
            estimate,
            center: CenterSource::Attached,
            inner_radius: estimate.radius / 2.0,
            left: Point::ZERO,
            right: Point::ZERO,
        }
    }

    pub fn center(&self) -> Point {
        match self.center {
            CenterSource::Attached => self.estimate.center,
            CenterSource::Detached { point } => point,
        }
    }

    pub fn center_source(&self) -> CenterSource {
        self.center
    }

    pub fn is_detached(&self) -> bool {
        matches!(self.center, CenterSource::Detached { .. })
    }

    /// The circle the sector is attached to
    pub fn estimate(&self) -> &Circle {
        &self.estimate
    }

    /// Updates the attached circle after a new fit
    pub fn set_estimate(&mut self, estimate: Circle) {
        self.estimate = estimate;
        self.inner_radius = self.inner_radius.min(estimate.radius);
        self.update_sector();
    }

    /// Moves the center by hand, detaching it from the estimate
    pub fn set_center(&mut self, x: f64, y: f64) {
        self.center = CenterSource::Detached { point: Point::new(x, y) };
    }

    /// Returns the center to the estimated circle
    pub fn attach(&mut self) {
        self.center = CenterSource::Attached;
    }

    pub fn radius(&self) -> f64 {
        self.estimate.radius
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.estimate.radius = radius.max(0.0);
        self.update_sector();
    }

    /// Sector circle around the current center
    pub fn circle(&self) -> Circle {
        Circle::new(self.center(), self.radius())
    }

    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    /// Sets the inner radius, kept between zero and the outer radius
    pub fn set_inner_radius(&mut self, radius: f64) {
        self.inner_radius = radius.clamp(0.0, self.radius());
    }

    pub fn inner_circle(&self) -> Circle {
        Circle::new(self.center(), self.inner_radius)
    }

    /// Left edge vector from the center
    pub fn left(&self) -> Point {
        self.left
    }

    /// Right edge vector from the center
    pub fn right(&self) -> Point {
        self.right
    }

    pub(crate) fn set_left(&mut self, vector: Point) {
        self.left = vector;
    }

    pub(crate) fn set_right(&mut self, vector: Point) {
        self.right = vector;
    }

    /// True when there is no wedge cut
    pub fn is_circle(&self) -> bool {
        self.left == self.right || self.left.length() == 0.0 || self.right.length() == 0.0
    }

    /// Removes the wedge cut
    pub fn collapse(&mut self) {
        self.left = Point::ZERO;
        self.right = Point::ZERO;
    }

    /// Direction of the left edge, radians in [0, 2pi)
    pub fn left_angle(&self) -> f64 {
        full_angle(self.left.y.atan2(self.left.x))
    }

    /// Direction of the right edge, radians in [0, 2pi)
    pub fn right_angle(&self) -> f64 {
        full_angle(self.right.y.atan2(self.right.x))
    }

    /// Wedge opening, counter-clockwise from right to left
    pub fn angle(&self) -> f64 {
        full_angle(self.left_angle() - self.right_angle())
    }

    pub fn set_left_angle(&mut self, radians: f64) {
        self.left = polar(self.radius(), radians);
    }

    pub fn set_right_angle(&mut self, radians: f64) {
        self.right = polar(self.radius(), radians);
    }

    /// Rescales the edge vectors to the current radius
    pub(crate) fn update_sector(&mut self) {
        if !self.is_circle() {
            self.left = polar(self.radius(), self.left_angle());
            self.right = polar(self.radius(), self.right_angle());
        }
    }

    /// Inside the circle and the wedge, or inside the inner circle
    pub fn is_inside(&self, x: f64, y: f64) -> bool {
        let circle = self.circle();
        if self.is_circle() {
            circle.contains(x, y)
        } else {
            (circle.contains(x, y) && self.raw_is_in_sector(x, y)) || self.inner_circle().contains(x, y)
        }
    }

    /// Direction test only, distance ignored
    pub fn is_in_sector(&self, x: f64, y: f64) -> bool {
        self.is_circle() || self.raw_is_in_sector(x, y)
    }

    pub(crate) fn raw_is_in_sector(&self, x: f64, y: f64) -> bool {
        let offset = Point::new(x, y).relative_to(&self.center());
        if self.left.is_clockwise_to(&self.right) {
            // opening under half a turn
            self.left.is_clockwise_to(&offset) && offset.is_clockwise_to(&self.right)
        } else {
            !(self.right.is_clockwise_to(&offset) && offset.is_clockwise_to(&self.left))
        }
    }

    /// Distance from the point to the nearest safe position, 0 when inside
    pub fn distance_outside(&self, x: f64, y: f64) -> f64 {
        if self.is_inside(x, y) {
            return 0.0;
        }
        let center = self.center();
        let point = Point::new(x, y);
        let from_center = center.distance_to(&point);
        let to_wedge = if self.is_in_sector(x, y) {
            from_center - self.radius()
        } else {
            let left_end = Point::new(center.x + self.left.x, center.y + self.left.y);
            let right_end = Point::new(center.x + self.right.x, center.y + self.right.y);
            distance_from_segment(&point, &center, &left_end)
                .min(distance_from_segment(&point, &center, &right_end))
        };
        let to_inner = if self.is_circle() {
            f64::MAX
        } else {
            from_center - self.inner_radius
        };
        to_wedge.min(to_inner).max(0.0)
    }
}

fn full_angle(radians: f64) -> f64 {
    radians.rem_euclid(TAU)
}

fn polar(radius: f64, radians: f64) -> Point {
    Point::new(radius * radians.cos(), radius * radians.sin())
}

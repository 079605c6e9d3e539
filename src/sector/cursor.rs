//! Drag handles for editing a safe sector
//!
//! A gesture starts with [`SafeSector::cursor`] hit-testing the pointer,
//! continues with any number of [`CursorMode::update`] calls and ends with
//! [`CursorMode::ready`]. Always keep the mode returned by `update`, a
//! radius-or-angle gesture turns into a more specific one once it moves.

use serde::{Deserialize, Serialize};

use crate::core::Point;
use crate::sector::safe_sector::SafeSector;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum CursorMode {
    /// Moves the whole sector
    Center { tolerance: f64 },
    /// Grabbed the rim of a full circle, undecided yet
    RadiusOrAngle { origin: Point, tolerance: f64 },
    Radius,
    Left { tolerance: f64 },
    Right { tolerance: f64 },
    InnerRadius { tolerance: f64 },
}

impl SafeSector {
    /// Hit-tests the pointer at (x, y) against the drag handles.
    /// `tolerance` is the grab distance in the same units as the sector.
    pub fn cursor(&self, x: f64, y: f64, tolerance: f64) -> Option<CursorMode> {
        let center = self.center();
        let pointer = Point::new(x, y);
        let offset = pointer.relative_to(&center);
        let from_center = offset.length();
        if from_center < tolerance {
            return Some(CursorMode::Center { tolerance });
        }
        if self.is_circle() {
            if (from_center - self.radius()).abs() < tolerance {
                return Some(CursorMode::RadiusOrAngle { origin: offset, tolerance });
            }
            return None;
        }
        if self.left().distance_to(&offset) < tolerance {
            return Some(CursorMode::Left { tolerance });
        }
        if self.right().distance_to(&offset) < tolerance {
            return Some(CursorMode::Right { tolerance });
        }
        if self.raw_is_in_sector(x, y) {
            if (from_center - self.radius()).abs() < tolerance {
                return Some(CursorMode::Radius);
            }
        } else if (from_center - self.inner_radius()).abs() < tolerance {
            return Some(CursorMode::InnerRadius { tolerance });
        }
        None
    }
}

impl CursorMode {
    /// Moves the handle to (x, y). Returns the mode to use from now on.
    pub fn update(self, sector: &mut SafeSector, x: f64, y: f64) -> CursorMode {
        let pointer = Point::new(x, y);
        match self {
            CursorMode::Center { .. } => {
                sector.set_center(x, y);
                self
            }
            CursorMode::RadiusOrAngle { origin, tolerance } => {
                let offset = pointer.relative_to(&sector.center());
                if origin.distance_to(&offset) <= tolerance {
                    return self;
                }
                // mostly radial movement resizes, tangential starts a wedge
                let next = if (offset.length() - sector.radius()).abs() > tolerance / 2.0 {
                    CursorMode::Radius
                } else if origin.is_clockwise_to(&offset) {
                    sector.set_right(origin);
                    CursorMode::Left { tolerance }
                } else {
                    sector.set_left(origin);
                    CursorMode::Right { tolerance }
                };
                next.update(sector, x, y)
            }
            CursorMode::Radius => {
                let radius = sector.center().distance_to(&pointer);
                sector.set_radius(radius);
                self
            }
            CursorMode::Left { .. } => {
                sector.set_left(pointer.relative_to(&sector.center()));
                self
            }
            CursorMode::Right { .. } => {
                sector.set_right(pointer.relative_to(&sector.center()));
                self
            }
            CursorMode::InnerRadius { tolerance } => {
                let radius = sector.center().distance_to(&pointer);
                if radius < sector.radius() && radius > tolerance {
                    sector.set_inner_radius(radius);
                }
                self
            }
        }
    }

    /// Finishes the gesture at (x, y)
    pub fn ready(self, sector: &mut SafeSector, x: f64, y: f64) {
        match self {
            CursorMode::Center { tolerance } => {
                self.update(sector, x, y);
                // a short nudge snaps back to the estimate
                if sector.center().distance_to(&sector.estimate().center) < tolerance / 3.0 {
                    sector.attach();
                }
            }
            CursorMode::RadiusOrAngle { .. } => {}
            CursorMode::Radius => {
                self.update(sector, x, y);
                let inner = sector.inner_radius().min(sector.radius());
                sector.set_inner_radius(inner);
            }
            CursorMode::Left { tolerance } | CursorMode::Right { tolerance } => {
                self.update(sector, x, y);
                sector.update_sector();
                // edges dragged together close the wedge
                if sector.left().distance_to(&sector.right()) < tolerance {
                    sector.collapse();
                }
            }
            CursorMode::InnerRadius { tolerance } => {
                self.update(sector, x, y);
                if sector.radius() - sector.inner_radius() < tolerance {
                    sector.collapse();
                    sector.set_inner_radius(sector.radius() / 2.0);
                }
            }
        }
    }
}

//! Real-world views of the internal geometry
//!
//! Everything here is expressed in plain longitude and latitude. Radii are
//! given both in degrees of latitude and in meters.

use serde::{Deserialize, Serialize};

use crate::algorithms::{ConvexPolygon, LocalLongitude};
use crate::core::{to_meters, Circle, Point};
use crate::sector::SafeSector;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self { longitude, latitude }
    }

    pub fn from_internal(point: &Point, local: &LocalLongitude) -> Self {
        let (longitude, latitude) = local.to_external_point(point);
        Self { longitude, latitude }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonView {
    pub points: Vec<GeoPoint>,
}

impl PolygonView {
    pub fn from_polygon(polygon: &ConvexPolygon, local: &LocalLongitude) -> Self {
        Self {
            points: polygon
                .vertices()
                .iter()
                .map(|p| GeoPoint::from_internal(p, local))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleView {
    pub center: GeoPoint,
    pub radius_deg: f64,
    pub radius_m: f64,
}

impl CircleView {
    pub fn from_circle(circle: &Circle, local: &LocalLongitude) -> Self {
        Self {
            center: GeoPoint::from_internal(&circle.center, local),
            radius_deg: circle.radius,
            radius_m: to_meters(circle.radius),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorView {
    pub center: GeoPoint,
    pub radius_deg: f64,
    pub radius_m: f64,
    pub inner_radius_deg: f64,
    pub inner_radius_m: f64,
    /// Outer ends of the wedge edges, absent for a full circle
    pub left: Option<GeoPoint>,
    pub right: Option<GeoPoint>,
    /// Wedge opening in degrees, 360 for a full circle
    pub angle_deg: f64,
    pub is_circle: bool,
    pub detached: bool,
}

impl SectorView {
    pub fn from_sector(sector: &SafeSector, local: &LocalLongitude) -> Self {
        let center = sector.center();
        let edge = |vector: Point| {
            GeoPoint::from_internal(&Point::new(center.x + vector.x, center.y + vector.y), local)
        };
        let is_circle = sector.is_circle();
        Self {
            center: GeoPoint::from_internal(&center, local),
            radius_deg: sector.radius(),
            radius_m: to_meters(sector.radius()),
            inner_radius_deg: sector.inner_radius(),
            inner_radius_m: to_meters(sector.inner_radius()),
            left: (!is_circle).then(|| edge(sector.left())),
            right: (!is_circle).then(|| edge(sector.right())),
            angle_deg: if is_circle { 360.0 } else { sector.angle().to_degrees() },
            is_circle,
            detached: sector.is_detached(),
        }
    }
}

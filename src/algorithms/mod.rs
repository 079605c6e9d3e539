//! Geometry algorithms: projection, convex hull and circle fitting

pub mod local_longitude;
pub mod convex_polygon;
pub mod circle_fitter;

pub use local_longitude::LocalLongitude;
pub use convex_polygon::ConvexPolygon;
pub use circle_fitter::CircleFitter;

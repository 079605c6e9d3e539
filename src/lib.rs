//! Anchor Watch
//!
//! Estimates the swing circle of an anchored vessel from GPS fixes and
//! raises an alarm when the vessel leaves the safe sector around it.

pub mod core;
pub mod algorithms;
pub mod sector;
pub mod watch;
pub mod api;
pub mod validation;
pub mod utils;

// Re-export commonly used types
pub use core::{to_degrees, to_meters, Circle, Fix, Point, DEGREE_TO_METERS};
pub use algorithms::{CircleFitter, ConvexPolygon, LocalLongitude};
pub use sector::{CenterSource, CursorMode, SafeSector};
pub use watch::{AnchorWatch, Estimate, Phase, Session};
pub use api::{AnchorEvent, CircleView, GeoPoint, PolygonView, SectorView, Watcher, WatcherHandle};
pub use validation::{ConfigError, ConfigResult, FixError};
pub use utils::AnchorWatchConfig;

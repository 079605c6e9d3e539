//! Public event and view types

pub mod callback;
pub mod types;

pub use callback::{AnchorEvent, Watcher, WatcherHandle, WatcherRegistry};
pub use types::{CircleView, GeoPoint, PolygonView, SectorView};

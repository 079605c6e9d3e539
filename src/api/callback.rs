//! Watcher callbacks
//!
//! Events are delivered synchronously from inside the update that caused
//! them, in registration order. A watcher is either a closure taking
//! `&AnchorEvent` or a type implementing [`Watcher`] for the events it
//! cares about.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::types::{CircleView, PolygonView, SectorView};
use crate::core::Fix;

/// Everything an anchor watch reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum AnchorEvent {
    /// The vessel is outside the safe sector by `distance_m` meters
    Alarm { distance_m: f64 },
    /// Every accepted fix, before any geometry is touched
    Location(Fix),
    /// The position hull grew
    Area(PolygonView),
    /// Hull part used for a refit when the estimated center fell outside the hull
    Outer(PolygonView),
    Estimated(CircleView),
    SafeSector(SectorView),
    /// Advisory throttling: nothing can change before the vessel moves `meters`
    SuggestNextUpdateIn { seconds: f64, meters: f64 },
}

pub trait Watcher: Send {
    fn alarm(&mut self, _distance_m: f64) {}
    fn location(&mut self, _fix: &Fix) {}
    fn area(&mut self, _area: &PolygonView) {}
    fn outer(&mut self, _outer: &PolygonView) {}
    fn estimated(&mut self, _estimated: &CircleView) {}
    fn safe_sector(&mut self, _sector: &SectorView) {}
    fn suggest_next_update_in(&mut self, _seconds: f64, _meters: f64) {}

    /// Dispatches to the per-event methods
    fn notify(&mut self, event: &AnchorEvent) {
        match event {
            AnchorEvent::Alarm { distance_m } => self.alarm(*distance_m),
            AnchorEvent::Location(fix) => self.location(fix),
            AnchorEvent::Area(area) => self.area(area),
            AnchorEvent::Outer(outer) => self.outer(outer),
            AnchorEvent::Estimated(estimated) => self.estimated(estimated),
            AnchorEvent::SafeSector(sector) => self.safe_sector(sector),
            AnchorEvent::SuggestNextUpdateIn { seconds, meters } => {
                self.suggest_next_update_in(*seconds, *meters)
            }
        }
    }
}

impl<F> Watcher for F
where
    F: FnMut(&AnchorEvent) + Send,
{
    fn notify(&mut self, event: &AnchorEvent) {
        self(event)
    }
}

/// Registration handle returned by `add_watcher`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatcherHandle(u32);

impl WatcherHandle {
    pub fn id(&self) -> u32 {
        self.0
    }
}

#[derive(Default)]
pub struct WatcherRegistry {
    counter: u32,
    watchers: Vec<(WatcherHandle, Box<dyn Watcher>)>,
}

impl WatcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, watcher: Box<dyn Watcher>) -> WatcherHandle {
        self.counter = self.counter.wrapping_add(1);
        let handle = WatcherHandle(self.counter);
        self.watchers.push((handle, watcher));
        handle
    }

    /// Returns false for an unknown handle
    pub fn remove(&mut self, handle: WatcherHandle) -> bool {
        let before = self.watchers.len();
        self.watchers.retain(|(h, _)| *h != handle);
        self.watchers.len() != before
    }

    pub fn len(&self) -> usize {
        self.watchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watchers.is_empty()
    }

    pub fn notify(&mut self, event: &AnchorEvent) {
        for (_, watcher) in self.watchers.iter_mut() {
            watcher.notify(event);
        }
    }
}

impl fmt::Debug for WatcherRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatcherRegistry")
            .field("watchers", &self.watchers.len())
            .finish()
    }
}

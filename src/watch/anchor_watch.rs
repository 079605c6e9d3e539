//! Anchor watch session
//!
//! Fixes are projected with the session's [`LocalLongitude`] and collected
//! into a convex hull. Once the hull gives an initial center the session
//! switches to the fitted phase and every hull growth refits the swing
//! circle. Each fix is tested against the safe sector as it was before the
//! fix, so a fix far away raises an alarm even though it then stretches
//! the hull.
//!
//! `AnchorWatch` is driven from one thread. Watchers run inside `update*`
//! and cannot call back into the watch, all mutation goes through
//! `&mut self`. Wrap it in a `Mutex` to share it.

use serde::{Deserialize, Serialize};

use crate::algorithms::{CircleFitter, ConvexPolygon, LocalLongitude};
use crate::api::callback::{AnchorEvent, Watcher, WatcherHandle, WatcherRegistry};
use crate::api::types::{CircleView, PolygonView, SectorView};
use crate::core::{to_degrees, to_meters, Circle, Fix, Point, KNOTS_TO_METERS_PER_SECOND};
use crate::sector::{CursorMode, SafeSector};
use crate::utils::config::AnchorWatchConfig;
use crate::validation::data::FixValidator;
use crate::validation::error::{ConfigError, ConfigResult, FixError};

/// Fitted state, created once per session and then only refined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    fitter: CircleFitter,
    safe_sector: SafeSector,
}

impl Estimate {
    pub fn fitter(&self) -> &CircleFitter {
        &self.fitter
    }

    pub fn safe_sector(&self) -> &SafeSector {
        &self.safe_sector
    }

    /// The estimated swing circle
    pub fn circle(&self) -> &Circle {
        self.safe_sector.estimate()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum Phase {
    /// Not enough spread in the fixes for a center yet
    #[default]
    Accumulating,
    Fitted(Box<Estimate>),
}

/// Geometry of one anchorage, everything except the watchers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    local_longitude: Option<LocalLongitude>,
    area: ConvexPolygon,
    outer: ConvexPolygon,
    phase: Phase,
    last_fix: Option<Fix>,
}

impl Session {
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn last_fix(&self) -> Option<&Fix> {
        self.last_fix.as_ref()
    }

    fn estimate(&self) -> Option<&Estimate> {
        match &self.phase {
            Phase::Fitted(estimate) => Some(&**estimate),
            Phase::Accumulating => None,
        }
    }
}

#[derive(Debug)]
pub struct AnchorWatch {
    config: AnchorWatchConfig,
    session: Session,
    watchers: WatcherRegistry,
}

impl Default for AnchorWatch {
    fn default() -> Self {
        Self::new()
    }
}

impl AnchorWatch {
    pub fn new() -> Self {
        Self {
            config: AnchorWatchConfig::default(),
            session: Session::default(),
            watchers: WatcherRegistry::new(),
        }
    }

    pub fn with_config(config: AnchorWatchConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    pub fn config(&self) -> &AnchorWatchConfig {
        &self.config
    }

    /// Radius of the seed circle. Only affects a session that has not
    /// reached the fitted phase yet.
    pub fn set_chain_length(&mut self, meters: f64) -> ConfigResult<()> {
        if !meters.is_finite() || meters <= 0.0 {
            return Err(ConfigError::invalid(
                "chain_length_m",
                meters,
                "must be a positive number of meters",
            ));
        }
        self.config.chain_length_m = meters;
        Ok(())
    }

    pub fn add_watcher<W: Watcher + 'static>(&mut self, watcher: W) -> WatcherHandle {
        self.watchers.add(Box::new(watcher))
    }

    pub fn remove_watcher(&mut self, handle: WatcherHandle) -> bool {
        self.watchers.remove(handle)
    }

    /// Starts a new anchorage. Watchers and configuration are kept.
    pub fn reset(&mut self) {
        log::info!("Anchor watch session reset");
        self.session = Session::default();
    }

    pub fn update(&mut self, longitude: f64, latitude: f64, time_ms: i64) -> Result<(), FixError> {
        self.update_fix(Fix::new(longitude, latitude, time_ms))
    }

    pub fn update_with_accuracy(
        &mut self,
        longitude: f64,
        latitude: f64,
        time_ms: i64,
        accuracy: f64,
    ) -> Result<(), FixError> {
        self.update_fix(Fix::new(longitude, latitude, time_ms).with_accuracy(accuracy))
    }

    /// `accuracy` in meters, `speed` in knots
    pub fn update_with_speed(
        &mut self,
        longitude: f64,
        latitude: f64,
        time_ms: i64,
        accuracy: f64,
        speed: f64,
    ) -> Result<(), FixError> {
        self.update_fix(
            Fix::new(longitude, latitude, time_ms)
                .with_accuracy(accuracy)
                .with_speed(speed),
        )
    }

    /// Feeds one fix. An invalid fix is logged and leaves the session as it was.
    pub fn update_fix(&mut self, fix: Fix) -> Result<(), FixError> {
        if let Err(error) = FixValidator::validate(&fix) {
            log::warn!("Ignoring fix at {}: {}", fix.time_ms, error);
            return Err(error);
        }
        notify(&mut self.watchers, || AnchorEvent::Location(fix));

        let local = *self.session.local_longitude.get_or_insert_with(|| {
            let local = LocalLongitude::new(fix.longitude, fix.latitude);
            log::info!(
                "Anchor watch started at {:.6}, {:.6} (pacific projection: {})",
                fix.longitude,
                fix.latitude,
                local.is_pacific()
            );
            local
        });
        let point = local.to_internal_point(fix.longitude, fix.latitude);
        let speed = self.speed_over_ground(&fix, &point, &local);
        self.do_update(&local, point, &fix, speed);
        self.session.last_fix = Some(fix);
        Ok(())
    }

    /// Meters per second, reported or derived from the previous fix
    fn speed_over_ground(&self, fix: &Fix, point: &Point, local: &LocalLongitude) -> f64 {
        if let Some(knots) = fix.speed {
            return knots * KNOTS_TO_METERS_PER_SECOND;
        }
        let Some(previous) = &self.session.last_fix else {
            return 0.0;
        };
        let elapsed_s = (fix.time_ms - previous.time_ms) as f64 / 1000.0;
        if elapsed_s <= 0.0 {
            return 0.0;
        }
        let from = local.to_internal_point(previous.longitude, previous.latitude);
        to_meters(from.distance_to(point)) / elapsed_s
    }

    fn do_update(&mut self, local: &LocalLongitude, point: Point, fix: &Fix, speed: f64) {
        let alarm = self.session.estimate().and_then(|estimate| {
            let sector = &estimate.safe_sector;
            (!sector.is_inside(point.x, point.y)).then(|| to_meters(sector.distance_outside(point.x, point.y)))
        });
        if let Some(distance_m) = alarm {
            log::warn!("Anchor alarm: {:.1} m outside the safe sector", distance_m);
            notify(&mut self.watchers, || AnchorEvent::Alarm { distance_m });
        }

        if self.session.area.add_point(point.x, point.y) {
            log::trace!("Position hull has {} vertices", self.session.area.len());
            notify(&mut self.watchers, || {
                AnchorEvent::Area(PolygonView::from_polygon(&self.session.area, local))
            });
            if matches!(self.session.phase, Phase::Accumulating) {
                self.start_estimate(local);
            }
            self.refit(local);
        } else if let Some(distance) = self.session.area.minimum_distance(point.x, point.y) {
            let mut meters = to_meters(distance);
            if let Some(accuracy) = fix.accuracy {
                meters = (meters - accuracy).max(0.0);
            }
            let max_seconds = self.config.max_suggested_interval_s;
            let seconds = if speed > 0.0 {
                (meters / speed).min(max_seconds)
            } else {
                max_seconds
            };
            notify(&mut self.watchers, || AnchorEvent::SuggestNextUpdateIn { seconds, meters });
        }
    }

    fn start_estimate(&mut self, local: &LocalLongitude) {
        let vertices = self.session.area.vertices();
        if vertices.len() < 3 {
            return;
        }
        let Some(initial) =
            CircleFitter::initial_center(vertices).or_else(|| CircleFitter::mean_center(vertices))
        else {
            return;
        };
        let seed = Circle::new(initial.center, to_degrees(self.config.chain_length_m));
        let fitter = CircleFitter::with_iterations(
            self.config.fit_max_iterations,
            self.config.fit_inner_iterations,
            self.config.fit_tolerance,
        );
        log::info!(
            "Initial anchor estimate from {} hull vertices, chain length {} m",
            self.session.area.len(),
            self.config.chain_length_m
        );
        let estimate = Estimate {
            fitter,
            safe_sector: SafeSector::new(seed),
        };
        notify(&mut self.watchers, || AnchorEvent::Estimated(CircleView::from_circle(&seed, local)));
        notify(&mut self.watchers, || {
            AnchorEvent::SafeSector(SectorView::from_sector(&estimate.safe_sector, local))
        });
        self.session.phase = Phase::Fitted(Box::new(estimate));
    }

    /// Fits against the full hull, or only its far side when the current
    /// center has drifted outside the hull. The choice is a heuristic.
    fn refit(&mut self, local: &LocalLongitude) {
        let Phase::Fitted(estimate) = &mut self.session.phase else {
            return;
        };
        let center = estimate.safe_sector.estimate().center;
        let fitted = if self.session.area.contains_point(&center) {
            estimate.fitter.fit(&center, self.session.area.vertices())
        } else {
            self.session.outer = self.session.area.outer_boundary(&center);
            notify(&mut self.watchers, || {
                AnchorEvent::Outer(PolygonView::from_polygon(&self.session.outer, local))
            });
            estimate.fitter.fit(&center, self.session.outer.vertices())
        };
        match fitted {
            Some(circle) => {
                log::debug!(
                    "Fitted swing circle radius {:.1} m, cost {:e}",
                    to_meters(circle.radius),
                    estimate.fitter.cost()
                );
                estimate.safe_sector.set_estimate(circle);
            }
            None => log::debug!("Circle fit skipped, keeping previous estimate"),
        }
        let sector = &estimate.safe_sector;
        notify(&mut self.watchers, || {
            AnchorEvent::Estimated(CircleView::from_circle(sector.estimate(), local))
        });
        notify(&mut self.watchers, || AnchorEvent::SafeSector(SectorView::from_sector(sector, local)));
    }

    /// Moves the safe sector center to the last fix. False before the
    /// first estimate.
    pub fn set_anchor_location(&mut self) -> bool {
        let (Some(local), Some(fix), Phase::Fitted(estimate)) = (
            self.session.local_longitude,
            self.session.last_fix,
            &mut self.session.phase,
        ) else {
            return false;
        };
        let point = local.to_internal_point(fix.longitude, fix.latitude);
        estimate.safe_sector.set_center(point.x, point.y);
        log::info!("Anchor location set to {:.6}, {:.6}", fix.longitude, fix.latitude);
        let sector = &estimate.safe_sector;
        notify(&mut self.watchers, || AnchorEvent::SafeSector(SectorView::from_sector(sector, &local)));
        true
    }

    /// Hit-tests a real-world position against the sector handles
    pub fn cursor_at(&self, longitude: f64, latitude: f64, tolerance_m: f64) -> Option<CursorMode> {
        let local = self.session.local_longitude?;
        let sector = &self.session.estimate()?.safe_sector;
        let point = local.to_internal_point(longitude, latitude);
        sector.cursor(point.x, point.y, to_degrees(tolerance_m))
    }

    /// Continues a drag gesture. Keep the returned mode for the next call.
    pub fn drag(&mut self, cursor: CursorMode, longitude: f64, latitude: f64) -> CursorMode {
        let (Some(local), Phase::Fitted(estimate)) = (self.session.local_longitude, &mut self.session.phase)
        else {
            return cursor;
        };
        let point = local.to_internal_point(longitude, latitude);
        let next = cursor.update(&mut estimate.safe_sector, point.x, point.y);
        let sector = &estimate.safe_sector;
        notify(&mut self.watchers, || AnchorEvent::SafeSector(SectorView::from_sector(sector, &local)));
        next
    }

    /// Ends a drag gesture
    pub fn release(&mut self, cursor: CursorMode, longitude: f64, latitude: f64) {
        let (Some(local), Phase::Fitted(estimate)) = (self.session.local_longitude, &mut self.session.phase)
        else {
            return;
        };
        let point = local.to_internal_point(longitude, latitude);
        cursor.ready(&mut estimate.safe_sector, point.x, point.y);
        let sector = &estimate.safe_sector;
        notify(&mut self.watchers, || AnchorEvent::SafeSector(SectorView::from_sector(sector, &local)));
    }

    /// Position hull, internal frame
    pub fn area(&self) -> &ConvexPolygon {
        &self.session.area
    }

    /// Hull part used by the last far-side refit, internal frame
    pub fn outer(&self) -> &ConvexPolygon {
        &self.session.outer
    }

    pub fn estimated(&self) -> Option<&Circle> {
        self.session.estimate().map(Estimate::circle)
    }

    pub fn safe_sector(&self) -> Option<&SafeSector> {
        self.session.estimate().map(Estimate::safe_sector)
    }

    /// Estimated radius in meters
    pub fn radius(&self) -> Option<f64> {
        self.estimated().map(|circle| to_meters(circle.radius))
    }

    /// Estimated center in real-world coordinates
    pub fn center(&self) -> Option<(f64, f64)> {
        let local = self.session.local_longitude?;
        self.estimated().map(|circle| local.to_external_point(&circle.center))
    }

    pub fn local_longitude(&self) -> Option<LocalLongitude> {
        self.session.local_longitude
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self.session.phase, Phase::Fitted(_))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Continues a saved anchorage
    pub fn restore(&mut self, session: Session) {
        log::info!(
            "Restored anchor watch session with {} hull vertices",
            session.area.len()
        );
        self.session = session;
    }
}

fn notify(watchers: &mut WatcherRegistry, event: impl FnOnce() -> AnchorEvent) {
    if !watchers.is_empty() {
        watchers.notify(&event());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording(watch: &mut AnchorWatch) -> (Arc<Mutex<Vec<AnchorEvent>>>, WatcherHandle) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let handle = watch.add_watcher(move |event: &AnchorEvent| sink.lock().unwrap().push(event.clone()));
        (events, handle)
    }

    fn alarms(events: &[AnchorEvent]) -> Vec<f64> {
        events
            .iter()
            .filter_map(|e| match e {
                AnchorEvent::Alarm { distance_m } => Some(*distance_m),
                _ => None,
            })
            .collect()
    }

    fn triangle(watch: &mut AnchorWatch) {
        watch.update(60.0001, 24.0, 0).unwrap();
        watch.update(59.9999, 24.0002, 60_000).unwrap();
        watch.update(60.0002, 24.0003, 120_000).unwrap();
    }

    fn square(watch: &mut AnchorWatch) {
        watch.update(0.0, 0.0, 0).unwrap();
        watch.update(0.001, 0.0, 10_000).unwrap();
        watch.update(0.001, 0.001, 20_000).unwrap();
        watch.update(0.0, 0.001, 30_000).unwrap();
    }

    fn last_suggestion(events: &[AnchorEvent]) -> Option<(f64, f64)> {
        events.iter().rev().find_map(|e| match e {
            AnchorEvent::SuggestNextUpdateIn { seconds, meters } => Some((*seconds, *meters)),
            _ => None,
        })
    }

    #[test]
    fn test_triangle_then_alarm() {
        let mut watch = AnchorWatch::new();
        let (events, _) = recording(&mut watch);

        triangle(&mut watch);
        assert!(watch.is_fitted());
        let radius = watch.estimated().unwrap().radius;
        assert!(radius > 0.0 && radius.is_finite());
        assert!(alarms(&events.lock().unwrap()).is_empty());

        watch.update(60.01, 24.01, 180_000).unwrap();
        let alarms = alarms(&events.lock().unwrap());
        assert_eq!(alarms.len(), 1);
        assert!(alarms[0] > 0.0);
    }

    #[test]
    fn test_swing_arc_refits_far_side() {
        let mut watch = AnchorWatch::new();
        let (events, _) = recording(&mut watch);
        let radius = to_degrees(40.0);

        for step in 0..=24 {
            let a = (step as f64 * 5.0).to_radians();
            watch
                .update(radius * a.cos(), radius * a.sin(), step as i64 * 60_000)
                .unwrap();
        }

        let events = events.lock().unwrap();
        let outers = events.iter().filter(|e| matches!(e, AnchorEvent::Outer(_))).count();
        assert!(outers > 0);
        assert!(!watch.outer().is_empty());
        assert!(alarms(&events).is_empty());

        assert!((watch.radius().unwrap() - 40.0).abs() < 0.01);
        let (longitude, latitude) = watch.center().unwrap();
        assert!(to_meters(longitude.hypot(latitude)) < 0.01);
    }

    #[test]
    fn test_nearly_aligned_hull_starts_from_centroid() {
        let mut watch = AnchorWatch::new();
        watch.update(0.0, 0.0, 0).unwrap();
        watch.update(0.001, 0.0, 60_000).unwrap();
        // bends the line just enough for a hull, too little for a circumcenter
        watch.update(0.002, 5e-13, 120_000).unwrap();

        assert_eq!(watch.area().len(), 3);
        assert!(CircleFitter::initial_center(watch.area().vertices()).is_none());
        assert!(watch.is_fitted());
        assert!(watch.estimated().is_some());
    }

    #[test]
    fn test_seed_circle_uses_chain_length() {
        let mut watch = AnchorWatch::new();
        watch.set_chain_length(60.0).unwrap();
        let (events, _) = recording(&mut watch);

        triangle(&mut watch);
        let first = events
            .lock()
            .unwrap()
            .iter()
            .find_map(|e| match e {
                AnchorEvent::Estimated(circle) => Some(*circle),
                _ => None,
            })
            .unwrap();
        assert!((first.radius_m - 60.0).abs() < 1e-6);
        assert!((first.radius_deg - 60.0 * 36.0 / 4_000_000.0).abs() < 1e-15);
    }

    #[test]
    fn test_invalid_chain_length() {
        let mut watch = AnchorWatch::new();
        assert!(watch.set_chain_length(-5.0).is_err());
        assert_eq!(watch.config().chain_length_m, 60.0);
    }

    #[test]
    fn test_accumulating_phase() {
        let mut watch = AnchorWatch::new();
        let (events, _) = recording(&mut watch);

        watch.update(24.0, 60.0, 0).unwrap();
        watch.update(24.0001, 60.0, 1000).unwrap();

        assert!(!watch.is_fitted());
        assert!(watch.estimated().is_none());
        assert!(watch.cursor_at(24.0, 60.0, 5.0).is_none());
        let events = events.lock().unwrap();
        assert_eq!(events.iter().filter(|e| matches!(e, AnchorEvent::Area(_))).count(), 2);
        assert!(matches!(events[0], AnchorEvent::Location(_)));
    }

    #[test]
    fn test_event_order_on_fit() {
        let mut watch = AnchorWatch::new();
        triangle(&mut watch);
        let (events, _) = recording(&mut watch);

        watch.update(60.0, 24.00035, 180_000).unwrap();
        let kinds: Vec<&'static str> = events
            .lock()
            .unwrap()
            .iter()
            .map(|e| match e {
                AnchorEvent::Location(_) => "location",
                AnchorEvent::Alarm { .. } => "alarm",
                AnchorEvent::Area(_) => "area",
                AnchorEvent::Outer(_) => "outer",
                AnchorEvent::Estimated(_) => "estimated",
                AnchorEvent::SafeSector(_) => "sector",
                AnchorEvent::SuggestNextUpdateIn { .. } => "suggest",
            })
            .filter(|k| *k != "alarm" && *k != "outer")
            .collect();
        assert_eq!(kinds, vec!["location", "area", "estimated", "sector"]);
    }

    #[test]
    fn test_suggest_next_update_with_reported_speed() {
        let mut watch = AnchorWatch::new();
        square(&mut watch);
        let (events, _) = recording(&mut watch);

        watch.update_with_speed(0.0005, 0.0002, 40_000, 2.0, 1.0).unwrap();
        let (seconds, meters) = last_suggestion(&events.lock().unwrap()).unwrap();

        let expected_meters = 0.0002 / (36.0 / 4_000_000.0) - 2.0;
        assert!((meters - expected_meters).abs() < 1e-6);
        assert!((seconds - expected_meters / (1852.0 / 3600.0)).abs() < 1e-6);
    }

    #[test]
    fn test_suggest_next_update_with_derived_speed() {
        let mut watch = AnchorWatch::new();
        square(&mut watch);
        watch.update(0.0005, 0.00011, 40_000).unwrap();
        let (events, _) = recording(&mut watch);

        // 10 m in 10 s
        watch.update(0.0005, 0.0002, 50_000).unwrap();
        let (seconds, meters) = last_suggestion(&events.lock().unwrap()).unwrap();

        assert!((meters - 0.0002 / (36.0 / 4_000_000.0)).abs() < 1e-6);
        assert!((seconds - meters).abs() < 1e-6);
    }

    #[test]
    fn test_suggest_next_update_when_still() {
        let mut watch = AnchorWatch::new();
        square(&mut watch);
        watch.update(0.0005, 0.0002, 40_000).unwrap();
        let (events, _) = recording(&mut watch);

        // same time stamp, no usable speed
        watch.update(0.0005, 0.0002, 40_000).unwrap();
        let (seconds, _) = last_suggestion(&events.lock().unwrap()).unwrap();
        assert_eq!(seconds, 60.0);
    }

    #[test]
    fn test_invalid_fix_is_ignored() {
        let mut watch = AnchorWatch::new();
        let (events, _) = recording(&mut watch);

        assert!(matches!(
            watch.update(f64::NAN, 60.0, 0),
            Err(FixError::InvalidLongitude(_))
        ));
        assert!(watch.update_with_accuracy(24.0, 60.0, 0, -1.0).is_err());

        assert!(events.lock().unwrap().is_empty());
        assert!(watch.local_longitude().is_none());
        assert!(watch.session().last_fix().is_none());
    }

    #[test]
    fn test_reset_keeps_watchers_and_config() {
        let mut watch = AnchorWatch::new();
        watch.set_chain_length(40.0).unwrap();
        let (events, _) = recording(&mut watch);
        triangle(&mut watch);

        watch.reset();
        assert!(!watch.is_fitted());
        assert!(watch.area().is_empty());
        assert!(watch.local_longitude().is_none());
        assert_eq!(watch.config().chain_length_m, 40.0);

        events.lock().unwrap().clear();
        watch.update(24.0, 60.0, 0).unwrap();
        assert_eq!(events.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_set_anchor_location() {
        let mut watch = AnchorWatch::new();
        assert!(!watch.set_anchor_location());

        triangle(&mut watch);
        assert!(watch.set_anchor_location());

        let sector = watch.safe_sector().unwrap();
        assert!(sector.is_detached());
        let local = watch.local_longitude().unwrap();
        let expected = local.to_internal_point(60.0002, 24.0003);
        assert!(sector.center().distance_to(&expected) < 1e-12);
    }

    #[test]
    fn test_remove_watcher() {
        let mut watch = AnchorWatch::new();
        let (events, handle) = recording(&mut watch);

        assert!(watch.remove_watcher(handle));
        watch.update(24.0, 60.0, 0).unwrap();
        assert!(events.lock().unwrap().is_empty());
        assert!(!watch.remove_watcher(handle));
    }

    #[test]
    fn test_pacific_session() {
        let mut watch = AnchorWatch::new();
        watch.update(179.9998, -17.0, 0).unwrap();
        watch.update(-179.9998, -17.0, 60_000).unwrap();
        watch.update(-180.0, -16.9998, 120_000).unwrap();

        assert!(watch.local_longitude().unwrap().is_pacific());
        assert!(watch.is_fitted());
        assert!(watch.radius().unwrap() < 100.0);
        let (longitude, latitude) = watch.center().unwrap();
        assert!(longitude.abs() > 179.99);
        assert!((latitude + 17.0).abs() < 0.001);
    }

    #[test]
    fn test_drag_center() {
        let mut watch = AnchorWatch::new();
        triangle(&mut watch);
        let (events, _) = recording(&mut watch);

        let (longitude, latitude) = watch.center().unwrap();
        let cursor = watch.cursor_at(longitude, latitude, 5.0).unwrap();
        assert!(matches!(cursor, CursorMode::Center { .. }));

        let north = latitude + to_degrees(20.0);
        let cursor = watch.drag(cursor, longitude, north);
        watch.release(cursor, longitude, north);

        let sector = watch.safe_sector().unwrap();
        assert!(sector.is_detached());
        let local = watch.local_longitude().unwrap();
        let (_, sector_latitude) = local.to_external_point(&sector.center());
        assert!((sector_latitude - north).abs() < 1e-12);
        let sector_events = events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, AnchorEvent::SafeSector(_)))
            .count();
        assert_eq!(sector_events, 2);
    }

    #[test]
    fn test_session_round_trip() {
        let mut watch = AnchorWatch::new();
        triangle(&mut watch);
        let json = serde_json::to_string(watch.session()).unwrap();

        let mut restored = AnchorWatch::new();
        restored.restore(serde_json::from_str(&json).unwrap());

        assert!(restored.is_fitted());
        let a = watch.estimated().unwrap();
        let b = restored.estimated().unwrap();
        assert!(a.center.distance_to(&b.center) < 1e-12);
        assert!((a.radius - b.radius).abs() < 1e-12);
        assert_eq!(restored.area().len(), watch.area().len());

        let (events, _) = recording(&mut restored);
        restored.update(60.01, 24.01, 180_000).unwrap();
        assert_eq!(alarms(&events.lock().unwrap()).len(), 1);
    }

    #[test]
    fn test_with_config_validates() {
        let mut config = AnchorWatchConfig::default();
        config.fit_max_iterations = 0;
        assert!(AnchorWatch::with_config(config).is_err());

        let mut config = AnchorWatchConfig::default();
        config.max_suggested_interval_s = 30.0;
        let watch = AnchorWatch::with_config(config).unwrap();
        assert_eq!(watch.config().max_suggested_interval_s, 30.0);
    }
}

//! Per-track transition detector.
//!
//! `ZoneMonitor` turns raw per-frame tracker output into debounced lifecycle
//! events. For every tracked vehicle it keeps two flags (`on_screen`,
//! `in_off_road`) and emits an event only when one of them flips:
//!
//! - `EnteredZone` / `LeftZone` when the center crosses into or out of the
//!   union of off-road zones,
//! - `Appeared` the first frame a track is seen after being absent,
//! - `Disappeared` the first frame an on-screen track is missing. The zone flag
//!   is cleared silently at the same time, so no `LeftZone` accompanies it.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::detect::{TrackId, TrackedObject, DEFAULT_TARGET_CLASSES};
use crate::track::{Track, DEFAULT_HISTORY_LEN};
use crate::zone::{Point, ZoneSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TrackEventKind {
    Appeared,
    Disappeared,
    EnteredZone,
    LeftZone,
}

impl TrackEventKind {
    /// Zone transitions are alerts; appear/disappear are informational.
    pub fn is_alert(self) -> bool {
        matches!(self, TrackEventKind::EnteredZone | TrackEventKind::LeftZone)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrackEvent {
    pub frame_index: u64,
    pub track_id: TrackId,
    pub class_id: u32,
    pub kind: TrackEventKind,
    /// Zone that contained the center, set on `EnteredZone` only.
    pub zone_id: Option<String>,
}

#[derive(Clone, Debug)]
pub struct MonitorConfig {
    /// Class ids that are tracked; everything else is ignored.
    pub target_classes: Vec<u32>,
    /// Sliding window length of each track's history.
    pub history_len: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            target_classes: DEFAULT_TARGET_CLASSES.to_vec(),
            history_len: DEFAULT_HISTORY_LEN,
        }
    }
}

pub struct ZoneMonitor {
    zones: ZoneSet,
    config: MonitorConfig,
    tracks: BTreeMap<TrackId, Track>,
}

impl ZoneMonitor {
    pub fn new(zones: ZoneSet, config: MonitorConfig) -> Self {
        Self {
            zones,
            config,
            tracks: BTreeMap::new(),
        }
    }

    pub fn zones(&self) -> &ZoneSet {
        &self.zones
    }

    /// Feed one frame of tracker output and collect the resulting events.
    ///
    /// Per detection the zone transition (if any) is reported before the
    /// appearance; disappearances follow all detections in ascending id order.
    pub fn observe(&mut self, frame_index: u64, objects: &[TrackedObject]) -> Vec<TrackEvent> {
        let mut events = Vec::new();
        let mut present = BTreeSet::new();
        let history_len = self.config.history_len;

        for obj in objects {
            let Some(id) = obj.track_id else {
                continue;
            };
            if !self.config.target_classes.contains(&obj.class_id) {
                continue;
            }

            let track = self
                .tracks
                .entry(id)
                .or_insert_with(|| Track::new(id, obj.class_id, history_len));
            track.class_id = obj.class_id;
            track.last_seen = frame_index;
            track.history.push(obj.center());
            present.insert(id);

            let zone = self.zones.containing(Point::from_center(obj.x, obj.y));
            let emit = |kind, zone_id| TrackEvent {
                frame_index,
                track_id: id,
                class_id: obj.class_id,
                kind,
                zone_id,
            };

            match (zone, track.state.in_off_road) {
                (Some(zone), false) => {
                    events.push(emit(
                        TrackEventKind::EnteredZone,
                        Some(zone.id().to_string()),
                    ));
                    track.state.in_off_road = true;
                }
                (None, true) => {
                    events.push(emit(TrackEventKind::LeftZone, None));
                    track.state.in_off_road = false;
                }
                _ => {}
            }

            if !track.state.on_screen {
                events.push(emit(TrackEventKind::Appeared, None));
                track.state.on_screen = true;
            }
        }

        for track in self.tracks.values_mut() {
            if track.state.on_screen && !present.contains(&track.id) {
                events.push(TrackEvent {
                    frame_index,
                    track_id: track.id,
                    class_id: track.class_id,
                    kind: TrackEventKind::Disappeared,
                    zone_id: None,
                });
                track.state.on_screen = false;
                track.state.in_off_road = false;
            }
        }

        events
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    /// All tracks ever seen, in ascending id order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> + '_ {
        self.tracks.values()
    }

    pub fn tracks_seen(&self) -> usize {
        self.tracks.len()
    }

    pub fn on_screen_count(&self) -> usize {
        self.tracks.values().filter(|t| t.state.on_screen).count()
    }

    pub fn in_zone_count(&self) -> usize {
        self.tracks.values().filter(|t| t.state.in_off_road).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::Zone;

    fn monitor() -> ZoneMonitor {
        let zone = Zone::new(
            "zone:test",
            vec![
                Point::new(0, 0),
                Point::new(100, 0),
                Point::new(100, 100),
                Point::new(0, 100),
            ],
        )
        .unwrap();
        ZoneMonitor::new(
            ZoneSet::new(vec![zone]).unwrap(),
            MonitorConfig {
                target_classes: vec![2, 7],
                history_len: 4,
            },
        )
    }

    fn kinds(events: &[TrackEvent]) -> Vec<(TrackId, TrackEventKind)> {
        events.iter().map(|e| (e.track_id, e.kind)).collect()
    }

    #[test]
    fn first_sight_inside_zone_reports_entry_then_appearance() {
        let mut m = monitor();
        let events = m.observe(0, &[TrackedObject::new(1, 2, 50.0, 50.0)]);
        assert_eq!(
            kinds(&events),
            vec![
                (1, TrackEventKind::EnteredZone),
                (1, TrackEventKind::Appeared)
            ]
        );
        assert_eq!(events[0].zone_id.as_deref(), Some("zone:test"));
        assert_eq!(m.in_zone_count(), 1);
    }

    #[test]
    fn steady_state_is_silent() {
        let mut m = monitor();
        m.observe(0, &[TrackedObject::new(1, 2, 150.0, 50.0)]);
        for frame in 1..10 {
            assert!(m
                .observe(frame, &[TrackedObject::new(1, 2, 150.0 + frame as f32, 50.0)])
                .is_empty());
        }
    }

    #[test]
    fn ignores_untracked_and_non_target_classes() {
        let mut m = monitor();
        let events = m.observe(
            0,
            &[
                TrackedObject::untracked(2, 50.0, 50.0),
                TrackedObject::new(9, 0, 50.0, 50.0),
            ],
        );
        assert!(events.is_empty());
        assert_eq!(m.tracks_seen(), 0);
    }

    #[test]
    fn filtered_class_counts_as_absent() {
        let mut m = monitor();
        m.observe(0, &[TrackedObject::new(3, 7, 150.0, 50.0)]);
        // Same id now reported with a non-vehicle class.
        let events = m.observe(1, &[TrackedObject::new(3, 0, 150.0, 50.0)]);
        assert_eq!(kinds(&events), vec![(3, TrackEventKind::Disappeared)]);
    }

    #[test]
    fn disappearance_clears_zone_without_exit_event() {
        let mut m = monitor();
        m.observe(0, &[TrackedObject::new(5, 2, 10.0, 10.0)]);
        let events = m.observe(1, &[]);
        assert_eq!(kinds(&events), vec![(5, TrackEventKind::Disappeared)]);
        let state = m.track(5).unwrap().state;
        assert!(!state.in_off_road);
        assert!(!state.on_screen);

        // Nothing further while absent.
        assert!(m.observe(2, &[]).is_empty());

        // Reappearing inside the zone re-enters; history is kept.
        let events = m.observe(3, &[TrackedObject::new(5, 2, 20.0, 20.0)]);
        assert_eq!(
            kinds(&events),
            vec![
                (5, TrackEventKind::EnteredZone),
                (5, TrackEventKind::Appeared)
            ]
        );
        assert_eq!(m.track(5).unwrap().history.len(), 2);
        assert_eq!(m.track(5).unwrap().last_seen, 3);
    }

    #[test]
    fn disappearances_come_last_in_id_order() {
        let mut m = monitor();
        m.observe(
            0,
            &[
                TrackedObject::new(8, 2, 150.0, 0.0),
                TrackedObject::new(4, 2, 150.0, 0.0),
                TrackedObject::new(6, 2, 150.0, 0.0),
            ],
        );
        let events = m.observe(1, &[TrackedObject::new(6, 2, 50.0, 50.0)]);
        assert_eq!(
            kinds(&events),
            vec![
                (6, TrackEventKind::EnteredZone),
                (4, TrackEventKind::Disappeared),
                (8, TrackEventKind::Disappeared),
            ]
        );
        assert_eq!(m.on_screen_count(), 1);
    }

    #[test]
    fn history_is_bounded() {
        let mut m = monitor();
        for frame in 0..10 {
            m.observe(frame, &[TrackedObject::new(1, 2, frame as f32, 200.0)]);
        }
        let track = m.track(1).unwrap();
        assert_eq!(track.history.len(), 4);
        assert_eq!(track.history.latest(), Some((9.0, 200.0)));
    }

    #[test]
    fn fractional_centers_are_truncated_before_zone_test() {
        let mut m = monitor();
        // 100.9 truncates to 100, which lies on the zone edge.
        let events = m.observe(0, &[TrackedObject::new(1, 2, 100.9, 50.0)]);
        assert_eq!(events[0].kind, TrackEventKind::EnteredZone);
    }
}

//! Per-object track state.

use std::collections::VecDeque;

use crate::detect::TrackId;

/// Number of recent centers kept per track by default.
pub const DEFAULT_HISTORY_LEN: usize = 30;

/// Membership flags compared frame to frame to detect transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrackState {
    pub in_off_road: bool,
    pub on_screen: bool,
}

/// Fixed-size sliding window of recent center points, oldest first.
#[derive(Clone, Debug)]
pub struct TrackHistory {
    points: VecDeque<(f32, f32)>,
    capacity: usize,
}

impl TrackHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, point: (f32, f32)) {
        while self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<(f32, f32)> {
        self.points.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(f32, f32)> + '_ {
        self.points.iter()
    }
}

/// A tracker identity together with its history and flags.
///
/// Tracks are created on first sight and never dropped during a run; when the
/// identifier stops appearing only the flags are reset.
#[derive(Clone, Debug)]
pub struct Track {
    pub id: TrackId,
    pub class_id: u32,
    pub history: TrackHistory,
    pub state: TrackState,
    /// Frame index of the most recent detection.
    pub last_seen: u64,
}

impl Track {
    pub fn new(id: TrackId, class_id: u32, history_len: usize) -> Self {
        Self {
            id,
            class_id,
            history: TrackHistory::new(history_len),
            state: TrackState::default(),
            last_seen: 0,
        }
    }
}

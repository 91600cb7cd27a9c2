use serde::{Deserialize, Serialize};

/// Persistent identifier assigned by the tracker to one physical object.
pub type TrackId = u64;

/// COCO class id for cars.
pub const COCO_CAR: u32 = 2;
/// COCO class id for trucks.
pub const COCO_TRUCK: u32 = 7;

/// Vehicle classes watched by default (car, truck).
pub const DEFAULT_TARGET_CLASSES: &[u32] = &[COCO_CAR, COCO_TRUCK];

const COCO_NAMES: &[&str] = &[
    "person",
    "bicycle",
    "car",
    "motorbike",
    "aeroplane",
    "bus",
    "train",
    "truck",
];

/// Human readable name for the first COCO classes, "class<N>" otherwise.
pub fn class_name(class_id: u32) -> String {
    COCO_NAMES
        .get(class_id as usize)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("class{}", class_id))
}

/// One row of tracker output for a frame.
///
/// Coordinates are in frame pixels; `x`/`y` is the bounding box center.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedObject {
    /// `None` when the tracker has not (yet) associated the box with a track.
    #[serde(rename = "id", default)]
    pub track_id: Option<TrackId>,
    #[serde(rename = "cls")]
    pub class_id: u32,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub w: f32,
    #[serde(default)]
    pub h: f32,
    #[serde(rename = "conf", default)]
    pub confidence: f32,
}

impl TrackedObject {
    pub fn new(track_id: TrackId, class_id: u32, x: f32, y: f32) -> Self {
        Self {
            track_id: Some(track_id),
            class_id,
            x,
            y,
            w: 0.0,
            h: 0.0,
            confidence: 1.0,
        }
    }

    pub fn untracked(class_id: u32, x: f32, y: f32) -> Self {
        Self {
            track_id: None,
            ..Self::new(0, class_id, x, y)
        }
    }

    pub fn with_size(mut self, w: f32, h: f32) -> Self {
        self.w = w;
        self.h = h;
        self
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

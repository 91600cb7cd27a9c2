mod backend;
mod backends;
mod result;

pub use backend::TrackerBackend;
pub use backends::{ReplayBackend, ScriptedBackend};
pub use result::{
    class_name, TrackId, TrackedObject, COCO_CAR, COCO_TRUCK, DEFAULT_TARGET_CLASSES,
};

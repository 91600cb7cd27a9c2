use anyhow::Result;

use crate::detect::result::TrackedObject;
use crate::frame::Frame;

/// Detector + tracker seam.
///
/// Implementations turn one frame into the tracked objects visible in it. Track
/// ids must stay stable across calls for the same physical object; the zone
/// monitor relies on that to debounce its events.
pub trait TrackerBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Run detection and association on a frame.
    fn track(&mut self, frame: &Frame) -> Result<Vec<TrackedObject>>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}

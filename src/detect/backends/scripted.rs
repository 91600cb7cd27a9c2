use anyhow::Result;
use std::collections::VecDeque;

use crate::detect::backend::TrackerBackend;
use crate::detect::result::TrackedObject;
use crate::frame::Frame;

/// Backend that plays back a fixed list of per-frame detections.
///
/// Each call to `track` pops the next entry; once the script is exhausted every
/// frame is empty.
#[derive(Default)]
pub struct ScriptedBackend {
    script: VecDeque<Vec<TrackedObject>>,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Vec<TrackedObject>>) -> Self {
        Self {
            script: script.into(),
        }
    }

    /// Append detections for one more frame.
    pub fn push_frame(&mut self, objects: Vec<TrackedObject>) {
        self.script.push_back(objects);
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl TrackerBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn track(&mut self, _frame: &Frame) -> Result<Vec<TrackedObject>> {
        Ok(self.script.pop_front().unwrap_or_default())
    }
}

//! Replay of tracker output recorded offline.
//!
//! The file holds one JSON object per line:
//!
//! ```text
//! {"frame": 0, "objects": [{"id": 3, "cls": 2, "x": 310.5, "y": 122.0, "w": 40, "h": 28, "conf": 0.81}]}
//! ```
//!
//! Frames without a line have no detections. Blank lines are skipped.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::detect::backend::TrackerBackend;
use crate::detect::result::TrackedObject;
use crate::frame::Frame;

#[derive(Debug, Deserialize)]
struct ReplayLine {
    frame: u64,
    #[serde(default)]
    objects: Vec<TrackedObject>,
}

/// Backend serving detections recorded by an external tracker.
pub struct ReplayBackend {
    frames: HashMap<u64, Vec<TrackedObject>>,
    last_frame: Option<u64>,
}

impl ReplayBackend {
    pub fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open detections file {}", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file))
            .with_context(|| format!("invalid detections file {}", path.display()))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut frames: HashMap<u64, Vec<TrackedObject>> = HashMap::new();
        for (n, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("read line {}", n + 1))?;
            if line.trim().is_empty() {
                continue;
            }
            let parsed: ReplayLine = serde_json::from_str(&line)
                .map_err(|e| anyhow!("line {}: {}", n + 1, e))?;
            frames.entry(parsed.frame).or_default().extend(parsed.objects);
        }
        let last_frame = frames.keys().copied().max();
        Ok(Self { frames, last_frame })
    }

    /// Highest frame index with recorded detections.
    pub fn last_frame(&self) -> Option<u64> {
        self.last_frame
    }

    pub fn frames_recorded(&self) -> usize {
        self.frames.len()
    }
}

impl TrackerBackend for ReplayBackend {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn track(&mut self, frame: &Frame) -> Result<Vec<TrackedObject>> {
        Ok(self.frames.remove(&frame.index).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"frame": 0, "objects": [{"id": 3, "cls": 2, "x": 310.5, "y": 122.0, "w": 40, "h": 28, "conf": 0.81}]}

{"frame": 2, "objects": [{"cls": 7, "x": 1.0, "y": 2.0}]}
{"frame": 2, "objects": [{"id": 4, "cls": 7, "x": 5.0, "y": 6.0}]}
"#;

    #[test]
    fn parses_lines_and_merges_duplicate_frames() {
        let mut backend = ReplayBackend::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(backend.frames_recorded(), 2);
        assert_eq!(backend.last_frame(), Some(2));

        let f0 = backend.track(&Frame::filled(0, 1, 1, [0; 3])).unwrap();
        assert_eq!(f0.len(), 1);
        assert_eq!(f0[0].track_id, Some(3));
        assert_eq!(f0[0].class_id, 2);
        assert!((f0[0].confidence - 0.81).abs() < 1e-6);

        assert!(backend.track(&Frame::filled(1, 1, 1, [0; 3])).unwrap().is_empty());

        let f2 = backend.track(&Frame::filled(2, 1, 1, [0; 3])).unwrap();
        assert_eq!(f2.len(), 2);
        assert_eq!(f2[0].track_id, None);
        assert_eq!(f2[1].track_id, Some(4));
    }

    #[test]
    fn reports_line_number_of_bad_json() {
        let err = ReplayBackend::from_reader("{\"frame\": 0}\nnot json\n".as_bytes())
            .err()
            .expect("bad line must fail");
        assert!(err.to_string().contains("line 2"), "{}", err);
    }
}

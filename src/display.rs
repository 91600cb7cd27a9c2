//! Display surfaces for annotated frames.

use anyhow::{anyhow, Context, Result};
use image::RgbImage;
use std::path::{Path, PathBuf};

#[cfg(feature = "display-window")]
mod window;
#[cfg(feature = "display-window")]
pub use window::WindowDisplay;

/// Consumer of one annotated image per processed frame.
pub trait Display {
    fn show(&mut self, frame_index: u64, image: &RgbImage) -> Result<()>;

    /// Whether `show` would use this frame; lets the caller skip annotation.
    fn wants_frame(&self, _frame_index: u64) -> bool {
        true
    }

    /// The viewer went away (window closed); the watcher stops.
    fn closed(&self) -> bool {
        false
    }
}

/// Discards every frame.
#[derive(Debug, Default)]
pub struct NullDisplay;

impl Display for NullDisplay {
    fn show(&mut self, _frame_index: u64, _image: &RgbImage) -> Result<()> {
        Ok(())
    }

    fn wants_frame(&self, _frame_index: u64) -> bool {
        false
    }
}

/// Writes every `every`-th annotated frame as a JPEG into a directory.
#[derive(Debug)]
pub struct SnapshotDisplay {
    dir: PathBuf,
    every: u64,
    written: u64,
}

impl SnapshotDisplay {
    pub fn new(dir: &Path, every: u64) -> Result<Self> {
        if every == 0 {
            return Err(anyhow!("snapshot interval must be >= 1"));
        }
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create snapshot directory {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            every,
            written: 0,
        })
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn path_for(&self, frame_index: u64) -> PathBuf {
        self.dir.join(format!("frame_{:06}.jpg", frame_index))
    }
}

impl Display for SnapshotDisplay {
    fn show(&mut self, frame_index: u64, image: &RgbImage) -> Result<()> {
        if !self.wants_frame(frame_index) {
            return Ok(());
        }
        let path = self.path_for(frame_index);
        image
            .save(&path)
            .with_context(|| format!("write snapshot {}", path.display()))?;
        self.written += 1;
        Ok(())
    }

    fn wants_frame(&self, frame_index: u64) -> bool {
        frame_index % self.every == 0
    }
}

//! Frame ingestion sources.
//!
//! This module turns a source description into a stream of decoded frames:
//! - Local video files (feature: ingest-file-ffmpeg)
//! - Local cameras by index, `/dev/video<N>` (feature: ingest-file-ffmpeg)
//! - Synthetic `stub://` frames (demos and tests)
//!
//! Ingestion is local-only: URL schemes other than `stub://` are rejected.
//! End of stream is reported as `Ok(None)`, never as an error.

pub mod file;
#[cfg(feature = "ingest-file-ffmpeg")]
pub(crate) mod file_ffmpeg;

pub use file::{FileSource, SourceOptions, SourceStats};

use anyhow::{anyhow, Result};
use std::path::PathBuf;

use crate::frame::Frame;

/// Producer of decoded frames.
pub trait FrameSource {
    /// Next frame, or `None` once the stream has ended.
    fn next_frame(&mut self) -> Result<Option<Frame>>;

    fn stats(&self) -> SourceStats;
}

/// Where frames come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceSpec {
    File(PathBuf),
    Camera(u32),
    Synthetic(String),
}

impl SourceSpec {
    /// All-digit input is a camera index, `stub://<name>` is synthetic, and
    /// anything else is a local file path.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(anyhow!("video source must not be empty"));
        }
        if let Some(name) = raw.strip_prefix("stub://") {
            return Ok(SourceSpec::Synthetic(name.to_string()));
        }
        if raw.contains("://") {
            return Err(anyhow!(
                "video source '{}' looks like a URL; only local files, camera indexes and stub:// are supported",
                raw
            ));
        }
        if raw.chars().all(|c| c.is_ascii_digit()) {
            let index = raw
                .parse()
                .map_err(|_| anyhow!("camera index '{}' is out of range", raw))?;
            return Ok(SourceSpec::Camera(index));
        }
        Ok(SourceSpec::File(PathBuf::from(raw)))
    }

    /// Path handed to the decoder.
    pub fn decoder_path(&self) -> String {
        match self {
            SourceSpec::File(path) => path.display().to_string(),
            SourceSpec::Camera(index) => format!("/dev/video{}", index),
            SourceSpec::Synthetic(name) => format!("stub://{}", name),
        }
    }
}

impl std::fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceSpec::Camera(index) => write!(f, "camera {}", index),
            _ => f.write_str(&self.decoder_path()),
        }
    }
}

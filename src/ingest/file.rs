//! Local frame source.
//!
//! `FileSource` wraps the concrete decoder selected by a `SourceSpec`:
//! - `stub://` specs produce synthetic frames,
//! - files and camera indexes go through FFmpeg when the `ingest-file-ffmpeg`
//!   feature is enabled.

use anyhow::{anyhow, Result};

#[cfg(feature = "ingest-file-ffmpeg")]
use super::file_ffmpeg::FfmpegFileSource;
use super::{FrameSource, SourceSpec};
use crate::frame::Frame;

/// Options shared by all source backends.
#[derive(Clone, Debug)]
pub struct SourceOptions {
    /// Synthetic frame width.
    pub width: u32,
    /// Synthetic frame height.
    pub height: u32,
    /// Stop after this many frames (synthetic source only).
    pub max_frames: Option<u64>,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            max_frames: None,
        }
    }
}

/// Statistics for a frame source.
#[derive(Clone, Debug)]
pub struct SourceStats {
    pub frames_captured: u64,
    pub source: String,
}

/// Local frame source.
pub struct FileSource {
    backend: FileBackend,
}

enum FileBackend {
    Synthetic(SyntheticFileSource),
    #[cfg(feature = "ingest-file-ffmpeg")]
    Ffmpeg(FfmpegFileSource),
}

impl FileSource {
    pub fn open(spec: &SourceSpec, options: SourceOptions) -> Result<Self> {
        match spec {
            SourceSpec::Synthetic(name) => Ok(Self {
                backend: FileBackend::Synthetic(SyntheticFileSource::new(name, options)?),
            }),
            #[cfg(feature = "ingest-file-ffmpeg")]
            SourceSpec::File(_) | SourceSpec::Camera(_) => Ok(Self {
                backend: FileBackend::Ffmpeg(FfmpegFileSource::open(&spec.decoder_path())?),
            }),
            #[cfg(not(feature = "ingest-file-ffmpeg"))]
            SourceSpec::File(_) | SourceSpec::Camera(_) => Err(anyhow!(
                "decoding {} requires the ingest-file-ffmpeg feature",
                spec
            )),
        }
    }
}

impl FrameSource for FileSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        match &mut self.backend {
            FileBackend::Synthetic(source) => Ok(source.next_frame()),
            #[cfg(feature = "ingest-file-ffmpeg")]
            FileBackend::Ffmpeg(source) => source.next_frame(),
        }
    }

    fn stats(&self) -> SourceStats {
        match &self.backend {
            FileBackend::Synthetic(source) => source.stats(),
            #[cfg(feature = "ingest-file-ffmpeg")]
            FileBackend::Ffmpeg(source) => source.stats(),
        }
    }
}

// ----------------------------------------------------------------------------
// Synthetic source (stub://) for demos and tests
// ----------------------------------------------------------------------------

struct SyntheticFileSource {
    name: String,
    options: SourceOptions,
    frame_count: u64,
}

impl SyntheticFileSource {
    fn new(name: &str, options: SourceOptions) -> Result<Self> {
        if options.width == 0 || options.height == 0 {
            return Err(anyhow!(
                "synthetic frames need a non-zero size, got {}x{}",
                options.width,
                options.height
            ));
        }
        log::info!(
            "FileSource: synthetic stub://{} ({}x{})",
            name,
            options.width,
            options.height
        );
        Ok(Self {
            name: name.to_string(),
            options,
            frame_count: 0,
        })
    }

    fn next_frame(&mut self) -> Option<Frame> {
        if let Some(max) = self.options.max_frames {
            if self.frame_count >= max {
                return None;
            }
        }
        let index = self.frame_count;
        self.frame_count += 1;
        // Slow gray ramp so consecutive frames differ.
        let shade = 64 + (index % 64) as u8;
        Some(Frame::filled(
            index,
            self.options.width,
            self.options.height,
            [shade, shade, shade],
        ))
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            frames_captured: self.frame_count,
            source: format!("stub://{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_source_counts_frames_and_ends() {
        let spec = SourceSpec::parse("stub://test").unwrap();
        let mut source = FileSource::open(
            &spec,
            SourceOptions {
                width: 4,
                height: 3,
                max_frames: Some(3),
            },
        )
        .unwrap();
        let mut indexes = Vec::new();
        while let Some(frame) = source.next_frame().unwrap() {
            assert_eq!((frame.width, frame.height), (4, 3));
            indexes.push(frame.index);
        }
        assert_eq!(indexes, vec![0, 1, 2]);
        assert!(source.next_frame().unwrap().is_none());
        let stats = source.stats();
        assert_eq!(stats.frames_captured, 3);
        assert_eq!(stats.source, "stub://test");
    }

    #[test]
    fn zero_sized_synthetic_source_rejected() {
        let spec = SourceSpec::parse("stub://bad").unwrap();
        let options = SourceOptions {
            width: 0,
            ..SourceOptions::default()
        };
        assert!(FileSource::open(&spec, options).is_err());
    }

    #[cfg(not(feature = "ingest-file-ffmpeg"))]
    #[test]
    fn files_need_ffmpeg_feature() {
        let spec = SourceSpec::parse("input2.mp4").unwrap();
        let err = FileSource::open(&spec, SourceOptions::default())
            .err()
            .expect("must fail without ffmpeg");
        assert!(err.to_string().contains("ingest-file-ffmpeg"));
    }
}

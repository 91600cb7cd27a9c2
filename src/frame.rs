//! Decoded video frames.
//!
//! - `Frame`: one RGB24 image plus its position in the stream.
//!
//! Frames flow from a `FrameSource` into the tracker backend and then into the
//! annotator. They are never buffered beyond the current loop iteration.

use anyhow::{anyhow, Result};
use image::RgbImage;

/// Bytes per RGB24 pixel.
pub const RGB_CHANNELS: usize = 3;

/// One decoded video frame in packed RGB24 layout.
pub struct Frame {
    /// Zero-based position in the stream.
    pub index: u64,
    pub width: u32,
    pub height: u32,
    pixels: Vec<u8>,
}

impl Frame {
    pub fn new(index: u64, width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * RGB_CHANNELS;
        if pixels.len() != expected {
            return Err(anyhow!(
                "frame {} is {}x{} but carries {} bytes (expected {})",
                index,
                width,
                height,
                pixels.len(),
                expected
            ));
        }
        Ok(Self {
            index,
            width,
            height,
            pixels,
        })
    }

    /// Solid-color frame, used by the synthetic source.
    pub fn filled(index: u64, width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * RGB_CHANNELS)
            .collect();
        Self {
            index,
            width,
            height,
            pixels,
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Copy into an `image` buffer for annotation.
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_raw(self.width, self.height, self.pixels.clone())
            .unwrap_or_else(|| RgbImage::new(self.width, self.height))
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("index", &self.index)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_pixel_buffer() {
        assert!(Frame::new(0, 4, 4, vec![0u8; 10]).is_err());
        assert!(Frame::new(0, 4, 4, vec![0u8; 48]).is_ok());
    }

    #[test]
    fn filled_frame_round_trips_into_image() {
        let frame = Frame::filled(7, 3, 2, [1, 2, 3]);
        assert_eq!(frame.pixels().len(), 18);
        let img = frame.to_image();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1).0, [1, 2, 3]);
    }
}

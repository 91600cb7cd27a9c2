//! Live OpenCV window (feature `display-window`).

use anyhow::{Context, Result};
use image::RgbImage;
use opencv::core::{AlgorithmHint, Mat, Mat_AUTO_STEP, CV_8UC3};
use opencv::prelude::*;
use opencv::{highgui, imgproc};

use super::Display;

const KEY_ESC: i32 = 27;
const KEY_Q: i32 = 'q' as i32;

/// Shows each annotated frame in a desktop window. Esc or `q` closes it.
pub struct WindowDisplay {
    title: String,
    closed: bool,
}

impl WindowDisplay {
    pub fn open(title: &str) -> Result<Self> {
        highgui::named_window(title, highgui::WINDOW_AUTOSIZE)
            .with_context(|| format!("open display window '{}'", title))?;
        Ok(Self {
            title: title.to_string(),
            closed: false,
        })
    }
}

impl Display for WindowDisplay {
    fn show(&mut self, _frame_index: u64, image: &RgbImage) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        // SAFETY: `rgb` borrows `image`'s buffer, which outlives it; the
        // conversion below copies into an owned Mat before `image` is released.
        let rgb = unsafe {
            Mat::new_rows_cols_with_data_unsafe(
                image.height() as i32,
                image.width() as i32,
                CV_8UC3,
                image.as_raw().as_ptr() as *mut _,
                Mat_AUTO_STEP,
            )
        }
        .context("wrap frame for display")?;
        let mut bgr = Mat::default();
        imgproc::cvt_color(
            &rgb,
            &mut bgr,
            imgproc::COLOR_RGB2BGR,
            0,
            AlgorithmHint::ALGO_HINT_DEFAULT,
        )
        .context("convert frame to BGR")?;

        highgui::imshow(&self.title, &bgr).context("show frame")?;
        let key = highgui::wait_key(1).context("poll window events")?;
        if key == KEY_ESC || key == KEY_Q {
            log::info!("display window closed");
            self.closed = true;
            let _ = highgui::destroy_window(&self.title);
        }
        Ok(())
    }

    fn closed(&self) -> bool {
        self.closed
    }
}

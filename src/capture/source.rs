//! Frame acquisition
//!
//! The detectors never talk to the screen directly. They ask a [`FrameSource`]
//! for a rectangle and own the returned [`Frame`] only for the duration of one call.

use super::region::Region;
use crate::error::{DetectError, DetectResult};
use image::RgbImage;
use std::path::Path;

/// A captured RGB pixel buffer
pub type Frame = RgbImage;

/// Anything that can hand out a pixel buffer for an absolute screen rectangle
pub trait FrameSource {
    fn capture_region(&self, region: &Region) -> DetectResult<Frame>;

    /// Full dimensions of the underlying screen
    fn dimensions(&self) -> (u32, u32);
}

/// Frame source backed by a single screenshot held in memory
pub struct ScreenshotSource {
    screenshot: RgbImage,
}

impl ScreenshotSource {
    pub fn new(screenshot: RgbImage) -> Self {
        Self { screenshot }
    }

    /// Load a screenshot from disk (png or jpeg)
    pub fn open(path: impl AsRef<Path>) -> DetectResult<Self> {
        let path = path.as_ref();
        let screenshot = image::open(path)?.to_rgb8();
        log::debug!(
            "Loaded screenshot {} ({}x{})",
            path.display(),
            screenshot.width(),
            screenshot.height()
        );
        Ok(Self::new(screenshot))
    }

    pub fn screenshot(&self) -> &RgbImage {
        &self.screenshot
    }
}

impl FrameSource for ScreenshotSource {
    fn capture_region(&self, region: &Region) -> DetectResult<Frame> {
        if !region.is_valid() {
            return Err(DetectError::invalid_input(format!(
                "capture region {region} has zero size"
            )));
        }
        let (width, height) = self.dimensions();
        if !region.fits_within(width, height) {
            return Err(DetectError::RegionOutOfBounds {
                region: *region,
                width,
                height,
            });
        }
        let cropped = image::imageops::crop_imm(
            &self.screenshot,
            region.x,
            region.y,
            region.width,
            region.height,
        );
        Ok(cropped.to_image())
    }

    fn dimensions(&self) -> (u32, u32) {
        self.screenshot.dimensions()
    }
}

//! HP bar tracking pipeline: capture -> resize -> profile -> edge -> stabilizer

use super::edge::{EdgeConfig, detect_edge};
use super::stabilizer::{DetectionSample, StabilizedEstimate, StabilizerConfig, TemporalStabilizer};
use crate::capture::{Frame, FrameSource, Region, luminance_profile, resize_by_height};
use crate::config::Config;
use crate::error::{DetectError, DetectResult};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HpBarReading {
    /// Raw single-frame measurement
    pub sample: DetectionSample,
    /// Stabilized output after feeding `sample`
    pub estimate: StabilizedEstimate,
}

impl HpBarReading {
    pub fn length(&self) -> Option<u32> {
        self.estimate.length
    }
}

/// Tracks one HP bar across frames
///
/// Owns its stabilizer state, so one detector corresponds to one on-screen bar.
#[derive(Debug, Clone)]
pub struct HpBarDetector {
    region_aspect_ratio: f64,
    std_height: u32,
    edge: EdgeConfig,
    stabilizer: TemporalStabilizer,
}

impl HpBarDetector {
    pub fn new(
        region_aspect_ratio: f64,
        std_height: u32,
        edge: EdgeConfig,
        stabilizer: StabilizerConfig,
    ) -> DetectResult<Self> {
        if !(region_aspect_ratio > 0.0) || std_height == 0 {
            return Err(DetectError::invalid_config(
                "hpbar_region_aspect_ratio/hpbar_detect_std_height",
                "must both be positive",
            ));
        }
        edge.validate()?;
        stabilizer.validate()?;
        Ok(Self {
            region_aspect_ratio,
            std_height,
            edge,
            stabilizer: TemporalStabilizer::new(stabilizer),
        })
    }

    pub fn from_config(config: &Config) -> DetectResult<Self> {
        Self::new(
            config.hpbar_region_aspect_ratio,
            config.hpbar_detect_std_height,
            config.edge_config(),
            config.stabilizer_config(),
        )
    }

    pub fn stabilizer(&self) -> &TemporalStabilizer {
        &self.stabilizer
    }

    /// The rectangle actually captured for a configured bar region
    ///
    /// Only the origin and height are taken from `region`; the width follows
    /// from the configured aspect ratio.
    pub fn capture_region(&self, region: &Region) -> Region {
        let width = (region.height as f64 * self.region_aspect_ratio) as u32;
        Region::new(region.x, region.y, width, region.height)
    }

    /// Capture the bar from `source` and update the running estimate
    ///
    /// With no region configured the reading is empty and the stabilizer is left untouched.
    pub fn detect<S: FrameSource + ?Sized>(
        &mut self,
        source: &S,
        region: Option<&Region>,
    ) -> DetectResult<HpBarReading> {
        let Some(region) = region else {
            return Ok(HpBarReading {
                sample: DetectionSample::new(None),
                estimate: StabilizedEstimate {
                    length: None,
                    stable_streak: self.stabilizer.stable_streak(),
                },
            });
        };
        let frame = source.capture_region(&self.capture_region(region))?;
        Ok(self.detect_frame(&frame))
    }

    /// Run the pipeline on an already captured bar frame
    pub fn detect_frame(&mut self, frame: &Frame) -> HpBarReading {
        let started = Instant::now();

        let original_width = frame.width();
        let resized = resize_by_height(frame, self.std_height);
        let profile = luminance_profile(&resized);
        let length = detect_edge(&profile, original_width, resized.width(), &self.edge);

        let sample = DetectionSample::new(length);
        let estimate = self.stabilizer.update(length);

        log::debug!(
            "HpBarDetector: lengths={:?}, estimate={:?}, time={:.3}s",
            self.stabilizer.history(),
            estimate,
            started.elapsed().as_secs_f64()
        );

        HpBarReading { sample, estimate }
    }
}

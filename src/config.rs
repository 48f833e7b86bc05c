//! Detector configuration
//!
//! Flat YAML keys, all optional; anything missing falls back to the defaults below.

use crate::error::{DetectError, DetectResult};
use crate::hpbar::{EdgeConfig, StabilizerConfig};
use crate::template_matching::ScaleRange;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Capture width is the region height times this ratio
    pub hpbar_region_aspect_ratio: f64,
    /// Height every HP bar capture is resized to before profiling
    pub hpbar_detect_std_height: u32,
    pub hpbar_border_v_peak_start: usize,
    pub hpbar_border_v_peak_lower: i32,
    pub hpbar_border_v_peak_threshold: i32,
    pub hpbar_border_v_peak_interval: usize,
    pub hpbar_recent_length_count: usize,
    /// `[min, max, steps]`
    pub scale_range: [f64; 3],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hpbar_region_aspect_ratio: 20.0,
            hpbar_detect_std_height: 20,
            hpbar_border_v_peak_start: 5,
            hpbar_border_v_peak_lower: 100,
            hpbar_border_v_peak_threshold: 30,
            hpbar_border_v_peak_interval: 4,
            hpbar_recent_length_count: 9,
            scale_range: [0.8, 1.2, 9.0],
        }
    }
}

impl Config {
    /// Load and validate a YAML config file
    pub fn load(path: &Path) -> DetectResult<Self> {
        let data = fs::read_to_string(path).map_err(|source| DetectError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&data)?;
        log::info!("Loaded detector config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> DetectResult<Self> {
        let config: Config = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DetectResult<()> {
        if !(self.hpbar_region_aspect_ratio > 0.0) {
            return Err(DetectError::invalid_config(
                "hpbar_region_aspect_ratio",
                "must be positive",
            ));
        }
        if self.hpbar_detect_std_height == 0 {
            return Err(DetectError::invalid_config(
                "hpbar_detect_std_height",
                "must be at least 1",
            ));
        }
        if self.hpbar_border_v_peak_lower < 0 || self.hpbar_border_v_peak_threshold < 0 {
            return Err(DetectError::invalid_config(
                "hpbar_border_v_peak_lower/threshold",
                "must not be negative",
            ));
        }
        self.edge_config().validate()?;
        self.stabilizer_config().validate()?;
        self.scale_range()?;
        Ok(())
    }

    pub fn edge_config(&self) -> EdgeConfig {
        EdgeConfig {
            start: self.hpbar_border_v_peak_start,
            peak_lower_bound: self.hpbar_border_v_peak_lower,
            rise_threshold: self.hpbar_border_v_peak_threshold,
            interval: self.hpbar_border_v_peak_interval,
        }
    }

    pub fn stabilizer_config(&self) -> StabilizerConfig {
        StabilizerConfig {
            recent_count: self.hpbar_recent_length_count,
            ..StabilizerConfig::default()
        }
    }

    pub fn scale_range(&self) -> DetectResult<ScaleRange> {
        let [min, max, steps] = self.scale_range;
        if steps.fract() != 0.0 || steps < 1.0 {
            return Err(DetectError::invalid_config(
                "scale_range",
                format!("step count must be a positive integer, got {steps}"),
            ));
        }
        ScaleRange::new(min, max, steps as usize)
    }
}

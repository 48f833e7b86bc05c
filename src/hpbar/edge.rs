//! Single-frame HP bar edge estimation
//!
//! The bar shows up on the value channel as two sustained brightness rises: the
//! left border and the trailing edge of the fill. The bar length is the position
//! of the second rise, mapped back to capture coordinates.

use crate::error::{DetectError, DetectResult};

/// Fixed correction added to every two-edge estimate, compensating resize bias
const EDGE_CORRECTION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeConfig {
    /// First profile index that is scanned
    pub start: usize,
    /// A sample must be brighter than this to sit on a peak
    pub peak_lower_bound: i32,
    /// Minimum brightness gain over a look-back sample to count as a rise
    pub rise_threshold: i32,
    /// Look-back window size
    pub interval: usize,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            start: 5,
            peak_lower_bound: 100,
            rise_threshold: 30,
            interval: 4,
        }
    }
}

impl EdgeConfig {
    pub fn validate(&self) -> DetectResult<()> {
        if self.interval < 2 {
            return Err(DetectError::invalid_config(
                "hpbar_border_v_peak_interval",
                format!("look-back window must be at least 2, got {}", self.interval),
            ));
        }
        Ok(())
    }
}

/// Whether sample `i` rose above enough of its look-back window
///
/// Needs a majority (`interval / 2`) of the previous `min(interval, i) - 1`
/// samples to be more than `rise_threshold` darker.
fn is_on_peak(profile: &[i32], i: usize, config: &EdgeConfig) -> bool {
    let current = profile[i];
    let rises = (1..config.interval.min(i))
        .filter(|&j| {
            current - profile[i - j] > config.rise_threshold && current > config.peak_lower_bound
        })
        .count();
    rises >= config.interval / 2
}

/// Locate the bar's trailing edge in a resized luminance profile
///
/// # Arguments
/// * `profile` - Value-channel samples of one scanline of the resized capture
/// * `original_width` - Width of the capture before resizing
/// * `resized_width` - Width of the resized capture the profile came from
///
/// # Returns
/// The edge position in capture pixels, or `None` unless two peak starts were seen.
pub fn detect_edge(
    profile: &[i32],
    original_width: u32,
    resized_width: u32,
    config: &EdgeConfig,
) -> Option<u32> {
    if resized_width == 0 {
        return None;
    }

    let mut peak_starts: Vec<usize> = Vec::with_capacity(2);
    let mut last_is_peak = false;
    let mut last_peak_index = None;

    for i in config.start..profile.len() {
        let cur_is_peak = is_on_peak(profile, i, config);
        if cur_is_peak {
            last_peak_index = Some(i);
        }
        if cur_is_peak && !last_is_peak {
            peak_starts.push(i);
            if peak_starts.len() == 2 {
                break;
            }
        }
        last_is_peak = cur_is_peak;
    }

    log::trace!("Peak starts in profile: {:?}", peak_starts);

    if peak_starts.len() < 2 {
        return None;
    }
    let index = last_peak_index? as u64;
    let length = index * original_width as u64 / resized_width as u64;
    Some(length as u32 + EDGE_CORRECTION)
}

//! Resolution normalisation and scanline brightness extraction

use super::source::Frame;
use image::imageops::{self, FilterType};

/// Resize a frame to `target_height`, keeping its aspect ratio
///
/// Detection thresholds are tuned for one standard height, so every capture is
/// brought to it before a profile is extracted.
pub fn resize_by_height(frame: &Frame, target_height: u32) -> Frame {
    let (width, height) = frame.dimensions();
    if height == 0 || height == target_height {
        return frame.clone();
    }
    let aspect_ratio = width as f64 / height as f64;
    let target_width = ((target_height as f64 * aspect_ratio) as u32).max(1);
    imageops::resize(frame, target_width, target_height, FilterType::Lanczos3)
}

/// HSV value channel (`max(r, g, b)`) along the middle scanline
pub fn luminance_profile(frame: &Frame) -> Vec<i32> {
    if frame.width() == 0 || frame.height() == 0 {
        return Vec::new();
    }
    let mid_y = frame.height() / 2;
    (0..frame.width())
        .map(|x| {
            let [r, g, b] = frame.get_pixel(x, mid_y).0;
            r.max(g).max(b) as i32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_resize_keeps_aspect_ratio() {
        let frame = RgbImage::new(400, 20);
        let resized = resize_by_height(&frame, 10);
        assert_eq!(resized.dimensions(), (200, 10));
    }

    #[test]
    fn test_resize_noop_at_target_height() {
        let frame = RgbImage::from_fn(30, 10, |x, _| Rgb([x as u8, 0, 0]));
        let resized = resize_by_height(&frame, 10);
        assert_eq!(resized, frame);
    }

    #[test]
    fn test_profile_uses_middle_row_value_channel() {
        let frame = RgbImage::from_fn(4, 5, |x, y| {
            if y == 2 {
                Rgb([x as u8 * 10, 200 - x as u8, 5])
            } else {
                Rgb([255, 255, 255])
            }
        });
        assert_eq!(luminance_profile(&frame), vec![200, 199, 198, 197]);
    }

    #[test]
    fn test_profile_of_empty_frame() {
        assert!(luminance_profile(&RgbImage::new(0, 0)).is_empty());
    }
}

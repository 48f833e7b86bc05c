/// Multi-scale template search
///
/// Locates a template inside a target frame when the on-screen scale of the
/// template is unknown, by scanning a fixed range of scale factors.
use super::types::{MatchCandidate, ScaleRange};
use crate::error::{DetectError, DetectResult};
use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};
use imageproc::template_matching::{
    MatchTemplateMethod, find_extremes, match_template, match_template_with_mask,
};

const METHOD: MatchTemplateMethod = MatchTemplateMethod::SumOfSquaredErrorsNormalized;

/// Exhaustive linear scan over template scales using normalized squared differences
#[derive(Clone, Debug)]
pub struct ScaleSearch {
    range: ScaleRange,
}

impl ScaleSearch {
    pub fn new(range: ScaleRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> &ScaleRange {
        &self.range
    }

    /// Find the best-aligned position and scale of `template` inside `target`
    ///
    /// # Arguments
    /// * `target` - The frame region to search in
    /// * `template` - Reference image, resized by every sampled scale
    /// * `mask` - Optional per-pixel weights, same size as the template
    ///
    /// # Returns
    /// The lowest-scoring candidate over all scales, or `None` when the resized
    /// template is larger than the target at every scale. On an exact score tie
    /// the earliest evaluated (smallest) scale is kept.
    pub fn search(
        &self,
        target: &GrayImage,
        template: &GrayImage,
        mask: Option<&GrayImage>,
    ) -> DetectResult<Option<MatchCandidate>> {
        if target.width() == 0 || target.height() == 0 {
            return Err(DetectError::invalid_input("target image is empty"));
        }
        if template.width() == 0 || template.height() == 0 {
            return Err(DetectError::invalid_input("template image is empty"));
        }
        if let Some(mask) = mask
            && mask.dimensions() != template.dimensions()
        {
            return Err(DetectError::invalid_input(format!(
                "mask {}x{} does not match template {}x{}",
                mask.width(),
                mask.height(),
                template.width(),
                template.height()
            )));
        }

        let mut best: Option<MatchCandidate> = None;

        for scale in self.range.factors() {
            let width = scaled_dimension(template.width(), scale);
            let height = scaled_dimension(template.height(), scale);

            if width == 0 || height == 0 {
                log::warn!(
                    "Skipping scale {:.3}: template {}x{} collapses to zero size",
                    scale,
                    template.width(),
                    template.height()
                );
                continue;
            }
            if width > target.width() || height > target.height() {
                log::debug!(
                    "Skipping scale {:.3}: template {}x{} larger than target {}x{}",
                    scale,
                    width,
                    height,
                    target.width(),
                    target.height()
                );
                continue;
            }

            let scaled_template = resize_to(template, width, height, FilterType::Triangle);
            let surface = match mask {
                Some(mask) => {
                    let scaled_mask = resize_to(mask, width, height, FilterType::Nearest);
                    match_template_with_mask(target, &scaled_template, METHOD, &scaled_mask)
                }
                None => match_template(target, &scaled_template, METHOD),
            };

            let extremes = find_extremes(&surface);
            let score = extremes.min_value;
            if score.is_nan() {
                log::debug!("Skipping scale {:.3}: degenerate correlation surface", scale);
                continue;
            }
            let (x, y) = extremes.min_value_location;
            log::debug!(
                "  scale {:.3}: best score {:.5} at ({},{})",
                scale,
                score,
                x,
                y
            );

            if best.as_ref().is_none_or(|current| score < current.score) {
                best = Some(MatchCandidate {
                    x,
                    y,
                    width,
                    height,
                    scale,
                    score,
                });
            }
        }

        Ok(best)
    }

    /// Convenience wrapper for RGB captures; matching runs on luma
    pub fn search_rgb(
        &self,
        target: &RgbImage,
        template: &RgbImage,
        mask: Option<&GrayImage>,
    ) -> DetectResult<Option<MatchCandidate>> {
        let target_gray = imageops::grayscale(target);
        let template_gray = imageops::grayscale(template);
        self.search(&target_gray, &template_gray, mask)
    }
}

/// Truncated `dim * scale`; the epsilon keeps e.g. 16 * 0.99999999 from becoming 15
fn scaled_dimension(dim: u32, scale: f64) -> u32 {
    (dim as f64 * scale + 1e-6).floor() as u32
}

fn resize_to(image: &GrayImage, width: u32, height: u32, filter: FilterType) -> GrayImage {
    if image.dimensions() == (width, height) {
        image.clone()
    } else {
        imageops::resize(image, width, height, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Deterministic texture with no zero pixels
    fn textured(width: u32, height: u32, seed: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let v = (x.wrapping_mul(37) ^ y.wrapping_mul(91)).wrapping_add(seed.wrapping_mul(13))
                ^ (x * y);
            Luma([(v % 250 + 5) as u8])
        })
    }

    fn paste(target: &mut GrayImage, patch: &GrayImage, x: u32, y: u32) {
        imageops::replace(target, patch, x as i64, y as i64);
    }

    #[test]
    fn test_finds_subregion_at_unit_scale() {
        let target = textured(60, 50, 1);
        let template = imageops::crop_imm(&target, 20, 15, 16, 12).to_image();
        let search = ScaleSearch::new(ScaleRange::new(0.9, 1.1, 5).unwrap());

        let found = search.search(&target, &template, None).unwrap().unwrap();

        assert_eq!((found.x, found.y), (20, 15));
        assert!((found.scale - 1.0).abs() < 1e-6, "scale was {}", found.scale);
        assert_eq!((found.width, found.height), (16, 12));
        assert!(found.score < 1e-6, "score was {}", found.score);
    }

    #[test]
    fn test_finds_upscaled_template() {
        let template = GrayImage::from_fn(8, 8, |x, y| Luma([(30 + x * 20 + y * 5) as u8]));
        let mut target = textured(48, 40, 7);
        let enlarged = imageops::resize(&template, 16, 16, FilterType::Triangle);
        paste(&mut target, &enlarged, 25, 9);

        let search = ScaleSearch::new(ScaleRange::new(1.5, 2.5, 3).unwrap());
        let found = search.search(&target, &template, None).unwrap().unwrap();

        assert_eq!((found.x, found.y), (25, 9));
        assert_eq!(found.scale, 2.0);
        assert!(found.score < 1e-6);
    }

    #[test]
    fn test_masked_search_finds_subregion() {
        let target = textured(40, 40, 3);
        let template = imageops::crop_imm(&target, 5, 22, 10, 10).to_image();
        let mask = GrayImage::from_fn(10, 10, |x, _| Luma([if x < 5 { 255 } else { 0 }]));
        let search = ScaleSearch::new(ScaleRange::identity());

        let found = search.search(&target, &template, Some(&mask)).unwrap().unwrap();
        assert_eq!((found.x, found.y), (5, 22));
        assert!(found.score < 1e-6);
    }

    #[test]
    fn test_template_too_large_is_a_miss() {
        let target = textured(10, 10, 1);
        let template = textured(12, 12, 2);
        let search = ScaleSearch::new(ScaleRange::new(1.0, 1.2, 4).unwrap());

        assert_eq!(search.search(&target, &template, None).unwrap(), None);
    }

    #[test]
    fn test_only_smallest_scale_fits() {
        let target = textured(10, 10, 1);
        let template = textured(12, 12, 2);
        // 0.8 -> 9x9 fits, 1.0 -> 12x12 and 1.2 -> 14x14 do not
        let search = ScaleSearch::new(ScaleRange::new(0.8, 1.2, 3).unwrap());

        let found = search.search(&target, &template, None).unwrap().unwrap();
        assert_eq!(found.scale, 0.8);
        assert_eq!((found.width, found.height), (9, 9));
        assert!(found.x <= 1 && found.y <= 1);
    }

    #[test]
    fn test_scaled_dimension_absorbs_float_error() {
        assert_eq!(scaled_dimension(16, 0.99999999), 16);
        assert_eq!((16.0_f64 * 0.99999999).floor() as u32, 15);
        assert_eq!(scaled_dimension(12, 0.9), 10);
        assert_eq!(scaled_dimension(12, 0.8), 9);
        assert_eq!(scaled_dimension(16, 0.05), 0);
    }

    #[test]
    fn test_equal_scores_keep_first_scale() {
        let target = GrayImage::from_pixel(30, 30, Luma([100]));
        let template = GrayImage::from_pixel(10, 10, Luma([100]));
        let search = ScaleSearch::new(ScaleRange::new(0.5, 1.0, 3).unwrap());

        let found = search.search(&target, &template, None).unwrap().unwrap();
        assert_eq!(found.scale, 0.5);
        assert_eq!((found.x, found.y), (0, 0));
        assert_eq!(found.width, 5);
    }

    #[test]
    fn test_empty_inputs_are_rejected() {
        let search = ScaleSearch::new(ScaleRange::identity());
        let empty = GrayImage::new(0, 0);
        let image = textured(10, 10, 1);

        assert!(search.search(&image, &empty, None).is_err());
        assert!(search.search(&empty, &image, None).is_err());
    }

    #[test]
    fn test_mask_size_mismatch_is_rejected() {
        let search = ScaleSearch::new(ScaleRange::identity());
        let target = textured(20, 20, 1);
        let template = textured(5, 5, 1);
        let mask = GrayImage::from_pixel(4, 5, Luma([255]));

        let err = search.search(&target, &template, Some(&mask)).unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_rgb_wrapper() {
        let target = RgbImage::from_fn(30, 30, |x, y| {
            image::Rgb([(x * 8 + 1) as u8, (y * 8 + 1) as u8, ((x ^ y) * 4 + 1) as u8])
        });
        let template = imageops::crop_imm(&target, 12, 3, 9, 9).to_image();
        let search = ScaleSearch::new(ScaleRange::identity());

        let found = search.search_rgb(&target, &template, None).unwrap().unwrap();
        assert_eq!((found.x, found.y), (12, 3));
    }
}

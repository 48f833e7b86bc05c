/// Template matching data types
use crate::error::{DetectError, DetectResult};

/// Inclusive range of template scale factors, sampled linearly
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleRange {
    min: f64,
    max: f64,
    steps: usize,
}

impl ScaleRange {
    pub fn new(min: f64, max: f64, steps: usize) -> DetectResult<Self> {
        if steps == 0 {
            return Err(DetectError::invalid_input("scale range needs at least one step"));
        }
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
            return Err(DetectError::invalid_input(format!(
                "scale range [{min}, {max}] must satisfy 0 < min <= max"
            )));
        }
        Ok(Self { min, max, steps })
    }

    /// A range containing only scale 1.0
    pub fn identity() -> Self {
        Self {
            min: 1.0,
            max: 1.0,
            steps: 1,
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Scale factors in evaluation order, low to high, both ends included
    pub fn factors(&self) -> impl Iterator<Item = f64> + '_ {
        let step = if self.steps > 1 {
            (self.max - self.min) / (self.steps - 1) as f64
        } else {
            0.0
        };
        (0..self.steps).map(move |i| {
            if i + 1 == self.steps && self.steps > 1 {
                self.max
            } else {
                self.min + step * i as f64
            }
        })
    }
}

/// Best alignment of a template inside a target frame
#[derive(Clone, Debug, PartialEq)]
pub struct MatchCandidate {
    /// X coordinate of the template's top-left corner in the target
    pub x: u32,
    /// Y coordinate of the template's top-left corner in the target
    pub y: u32,
    /// Width of the resized template
    pub width: u32,
    /// Height of the resized template
    pub height: u32,
    /// Scale factor the template was resized by
    pub scale: f64,
    /// Normalized squared difference, lower is better (0.0 = identical)
    pub score: f32,
}

impl MatchCandidate {
    /// Center of the matched area, in target coordinates
    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Whether the match is good enough under a maximum-score threshold
    pub fn is_confident(&self, max_score: f32) -> bool {
        self.score <= max_score
    }
}

impl std::fmt::Display for MatchCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({},{}) {}x{} scale={:.3} score={:.4}",
            self.x, self.y, self.width, self.height, self.scale, self.score
        )
    }
}

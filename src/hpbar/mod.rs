//! HP bar length detection
//!
//! Turns noisy single-frame bar edge measurements into a temporally stable
//! length estimate for the overlay.

pub mod detector;
pub mod edge;
pub mod stabilizer;


// Re-export main types and functions
pub use detector::{HpBarDetector, HpBarReading};
pub use edge::{EdgeConfig, detect_edge};
pub use stabilizer::{DetectionSample, StabilizedEstimate, StabilizerConfig, TemporalStabilizer};

pub mod capture;
pub mod config;
pub mod error;
pub mod hpbar;
pub mod map_pattern;
pub mod template_matching;

pub use config::Config;
pub use error::{DetectError, DetectResult};
pub use hpbar::{HpBarDetector, TemporalStabilizer};
pub use map_pattern::PatternNarrowingIndex;
pub use template_matching::{MatchCandidate, ScaleRange, ScaleSearch};

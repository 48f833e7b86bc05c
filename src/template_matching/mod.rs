/// Template matching module for locating icons and POI markers in captures
///
/// This module provides:
/// - Multi-scale search over a linear range of template scale factors
/// - Normalized squared-difference scoring (lower is better), optionally masked
/// - Deterministic tie-breaking in favour of the first evaluated scale
pub mod matcher;
pub mod types;

pub use matcher::ScaleSearch;
pub use types::{MatchCandidate, ScaleRange};

//! Map pattern reference data and the POI narrowing index
//!
//! Loading the reference tables is left to the caller; this module only
//! consumes the typed pattern collection.

pub mod index;
pub mod types;

pub use index::{PatternKey, PatternNarrowingIndex, PositionKey, narrow_patterns};
pub use types::{Construct, MapPattern, PoiType, Position};

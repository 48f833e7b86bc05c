//! Frame capture and preprocessing
//!
//! Screen grabbing itself is owned by the caller; this module defines the
//! narrow interface the detectors consume and the preprocessing they share.

pub mod luminance;
pub mod region;
pub mod source;

pub use luminance::{luminance_profile, resize_by_height};
pub use region::Region;
pub use source::{Frame, FrameSource, ScreenshotSource};

use crate::capture::Region;
use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for detection operations.
pub type DetectResult<T> = Result<T, DetectError>;

/// The error type for detection, capture and configuration.
///
/// Expected misses (no template match, no bar edge) are not errors and are
/// reported as `None` by the respective components.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("Invalid input: {description}")]
    InvalidInput { description: String },

    #[error("Invalid configuration value for '{field}': {description}")]
    InvalidConfig { field: String, description: String },

    #[error("Region {region} exceeds frame bounds ({width}x{height})")]
    RegionOutOfBounds {
        region: Region,
        width: u32,
        height: u32,
    },

    #[error("Failed to load image: {source}")]
    ImageLoad {
        #[from]
        source: image::ImageError,
    },

    #[error("Failed to read config file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {source}")]
    ConfigParse {
        #[from]
        source: serde_yml::Error,
    },
}

impl DetectError {
    pub fn invalid_input(description: impl Into<String>) -> Self {
        DetectError::InvalidInput {
            description: description.into(),
        }
    }

    pub fn invalid_config(field: &str, description: impl Into<String>) -> Self {
        DetectError::InvalidConfig {
            field: field.to_string(),
            description: description.into(),
        }
    }

    /// Check if this error is a caller contract violation rather than an I/O problem
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            DetectError::InvalidInput { .. } | DetectError::RegionOutOfBounds { .. }
        )
    }
}

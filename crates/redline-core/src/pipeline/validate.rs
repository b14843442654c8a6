//! Input validation before decoding.

use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::PipelineError;
use crate::media::MediaType;

/// Validates files before they enter the decode stage.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Perform quick validation before decode.
    ///
    /// Checks:
    /// - File exists
    /// - Media type is in the accepted set
    /// - File size is within limits
    ///
    /// Returns the classified media type on success. Failures here become
    /// display-only rejection entries; they never abort the run.
    pub fn validate(&self, path: &Path) -> Result<MediaType, PipelineError> {
        if !path.exists() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }

        let media_type = MediaType::from_path(path)
            .ok_or_else(|| PipelineError::UnsupportedMediaType {
                path: path.to_path_buf(),
            })?;

        let metadata = std::fs::metadata(path).map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read metadata: {}", e),
        })?;

        let max_bytes = self.limits.max_file_size_mb * 1024 * 1024;
        if metadata.len() > max_bytes {
            return Err(PipelineError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        Ok(media_type)
    }
}

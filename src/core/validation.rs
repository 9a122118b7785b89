//! Acceptance rules for candidate files
//!
//! Rules are applied in order and the first failure wins:
//! 1. the declared media type must be an accepted image format
//! 2. the size must not exceed the byte limit

use super::candidate::{CandidateFile, ImageFormat};
use super::errors::ValidationError;

/// Default upload limit: 25 MiB
pub const MAX_FILE_SIZE: u64 = 25 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    allowed: Vec<ImageFormat>,
    max_bytes: u64,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            allowed: ImageFormat::ALL.to_vec(),
            max_bytes: MAX_FILE_SIZE,
        }
    }
}

impl ValidationPolicy {
    /// Default formats with a custom size limit
    pub fn with_max_bytes(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            ..Self::default()
        }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn validate(&self, file: &CandidateFile) -> Result<ImageFormat, ValidationError> {
        self.check(file.media_type(), file.size())
    }

    /// Validate a declared media type and size without needing the bytes
    pub fn check(&self, media_type: &str, size: u64) -> Result<ImageFormat, ValidationError> {
        let format = ImageFormat::from_mime_type(media_type)
            .filter(|f| self.allowed.contains(f))
            .ok_or_else(|| ValidationError::UnsupportedFileType {
                media_type: media_type.to_string(),
            })?;

        if size > self.max_bytes {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_bytes,
            });
        }

        Ok(format)
    }
}

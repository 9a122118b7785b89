//! Domain error types
//!
//! These errors are local to the client: they are raised before anything
//! reaches the network. Transport and fetch failures live in `api::error`.

use thiserror::Error;

/// Rejection reasons from the validation policy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Declared media type is not one of the accepted image formats
    #[error("unsupported file type")]
    UnsupportedFileType { media_type: String },

    /// File exceeds the upload size limit
    #[error("file too large")]
    FileTooLarge { size: u64, max: u64 },
}

/// Errors from upload session operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Submit was requested with no accepted candidate
    #[error("please select a file first")]
    NoCandidate,

    /// Preview derivation task did not complete
    #[error("failed to render preview: {0}")]
    Preview(String),
}

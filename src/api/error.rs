//! Typed errors for calls to the inference service
//!
//! `Display` output is the message shown to the user, so the variants carry
//! the technical cause separately from what gets rendered.

use thiserror::Error;

use super::types::ErrorBody;

/// Failure of a prediction submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Non-success status with a `detail` message from the service
    #[error("{detail}")]
    Server { status: u16, detail: String },

    /// Non-success status without a usable `detail`
    #[error("prediction failed")]
    PredictionFailed { status: u16 },

    /// Success status but the body is not a prediction
    #[error("malformed response")]
    MalformedResponse(String),

    /// No response was received (connection refused, reset, DNS, ...)
    #[error("failed to upload and process image")]
    Upload(String),
}

impl TransportError {
    /// Convert a non-success status and its raw body into a typed error
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        match parsed.detail_text() {
            Some(detail) => TransportError::Server {
                status: status.as_u16(),
                detail: detail.to_string(),
            },
            None => TransportError::PredictionFailed {
                status: status.as_u16(),
            },
        }
    }

    /// Convert network/connection errors into a typed error
    pub fn from_network_error(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Upload(format!("Request timeout: {}", e))
        } else if e.is_connect() {
            TransportError::Upload(format!("Connection failed: {}", e))
        } else {
            TransportError::Upload(e.to_string())
        }
    }

    /// HTTP status, when the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Server { status, .. } | TransportError::PredictionFailed { status } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Failure of a read-only fetch (history listing, service probes)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("failed to fetch {resource}")]
    Status { resource: &'static str, status: u16 },

    #[error("failed to fetch {resource}")]
    Network {
        resource: &'static str,
        message: String,
    },

    #[error("failed to fetch {resource}")]
    Malformed {
        resource: &'static str,
        message: String,
    },
}

impl FetchError {
    pub fn from_network_error(resource: &'static str, e: reqwest::Error) -> Self {
        FetchError::Network {
            resource,
            message: e.to_string(),
        }
    }
}

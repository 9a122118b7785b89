//! Core traits for the domain layer
//!
//! The upload session and the history view depend on these rather than on
//! the HTTP client, so tests can drive them with in-memory fakes.

use super::candidate::CandidateFile;
use crate::api::{FetchError, HistoryPage, PredictionResponse, TransportError};
use async_trait::async_trait;

/// Submits a validated candidate to the inference service.
///
/// One attempt per call; implementations must not retry.
#[async_trait]
pub trait PredictionTransport: Send + Sync {
    async fn submit(&self, file: &CandidateFile) -> Result<PredictionResponse, TransportError>;
}

/// Source of past predictions, most recent first
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn fetch_history(&self, limit: usize, skip: usize) -> Result<HistoryPage, FetchError>;
}

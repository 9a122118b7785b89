//! agriscan: plant disease scanning client
//!
//! This library provides:
//! - Validation of candidate leaf photos (type and size)
//! - The upload session state machine, with stale async results discarded
//! - An HTTP client for the inference service (predict, history, health)
//! - Display-ready derivations of a diagnosis
//! - History listing with summary statistics

pub mod api;
pub mod config;
pub mod core;
pub mod history;
pub mod presenter;
pub mod transport;

pub use api::ApiClient;
pub use config::Config;
pub use crate::core::{CandidateFile, SessionState, UploadSession, ValidationPolicy};
pub use history::{summarize, ConfidenceBand, HistoryAggregate, HistoryAggregator};
pub use presenter::{PredictionView, ResultPresenter};

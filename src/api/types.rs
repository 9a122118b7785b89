//! Wire types for the inference service

use serde::{Deserialize, Deserializer, Serialize};

/// Label the service uses for "no disease found"
pub const HEALTHY_LABEL: &str = "Healthy";

/// Body of a successful `POST /predictions/predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction_id: String,
    /// Echo of the uploaded filename (not always sent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub predicted_disease: String,
    /// Confidence of the primary label, 0..=1
    pub confidence: f64,
    /// Full ranking, highest confidence first; absent or null means empty
    #[serde(default, deserialize_with = "null_as_empty")]
    pub all_predictions: Vec<RankedPrediction>,
    /// ISO-8601
    pub timestamp: String,
}

impl PredictionResponse {
    pub fn is_healthy(&self) -> bool {
        self.predicted_disease == HEALTHY_LABEL
    }
}

/// One `(label, confidence)` pair of the ranked list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPrediction {
    #[serde(rename = "class")]
    pub label: String,
    pub confidence: f64,
}

/// A past prediction as listed by `GET /predictions/history`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub prediction_id: String,
    pub filename: String,
    pub predicted_disease: String,
    pub confidence: f64,
    pub timestamp: String,
}

impl HistoryRecord {
    pub fn is_healthy(&self) -> bool {
        self.predicted_disease == HEALTHY_LABEL
    }
}

/// Body of `GET /predictions/history`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryPage {
    /// Number of stored predictions on the service, across all pages
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<HistoryRecord>,
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub timestamp: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Body of `GET /`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    #[serde(default)]
    pub version: String,
}

/// Body of a non-success response
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Human-readable detail, if the service sent a non-empty string
    pub fn detail_text(&self) -> Option<&str> {
        self.detail
            .as_ref()
            .and_then(|d| d.as_str())
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

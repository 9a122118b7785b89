//! Display-ready values derived from a prediction
//!
//! Pure functions only: the same response always yields the same view.

pub mod care;

pub use care::CareAction;

use crate::api::{PredictionResponse, RankedPrediction};
use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;

/// How the result should be framed to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Framing {
    /// Reassurance: no disease found
    Healthy,
    /// Warning: a disease was detected
    DiseaseDetected,
}

impl Framing {
    pub fn title(&self) -> &'static str {
        match self {
            Framing::Healthy => "Plant Looks Healthy!",
            Framing::DiseaseDetected => "Disease Detected",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Framing::Healthy => {
                "No diseases detected. Continue with regular care and monitoring to maintain plant health."
            }
            Framing::DiseaseDetected => {
                "This plant shows signs of disease. Please consult with agricultural experts for proper treatment and management strategies."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub label: String,
    /// Percentage rounded to one decimal
    pub percent: f64,
}

impl RankedEntry {
    pub fn display(&self) -> String {
        format!("{:.1}%", self.percent)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionView {
    pub prediction_id: String,
    pub filename: Option<String>,
    pub disease: String,
    pub is_healthy: bool,
    /// Percentage rounded to one decimal, e.g. `82.3`
    pub confidence_percent: f64,
    pub ranked: Vec<RankedEntry>,
    pub framing: Framing,
    pub timestamp: String,
    pub care: Vec<CareAction>,
}

impl PredictionView {
    /// Confidence as shown to the user, e.g. `82.3%`
    pub fn confidence_display(&self) -> String {
        format!("{:.1}%", self.confidence_percent)
    }
}

pub struct ResultPresenter;

impl ResultPresenter {
    pub fn present(prediction: &PredictionResponse) -> PredictionView {
        let is_healthy = prediction.is_healthy();
        PredictionView {
            prediction_id: prediction.prediction_id.clone(),
            filename: prediction.filename.clone(),
            disease: prediction.predicted_disease.clone(),
            is_healthy,
            confidence_percent: percent(prediction.confidence),
            ranked: prediction.all_predictions.iter().map(ranked_entry).collect(),
            framing: if is_healthy {
                Framing::Healthy
            } else {
                Framing::DiseaseDetected
            },
            timestamp: format_timestamp(&prediction.timestamp),
            care: care::actions_for(&prediction.predicted_disease).to_vec(),
        }
    }
}

fn ranked_entry(entry: &RankedPrediction) -> RankedEntry {
    RankedEntry {
        label: entry.label.clone(),
        percent: percent(entry.confidence),
    }
}

/// Convert a 0..=1 confidence to a percentage with one decimal,
/// rounding half away from zero.
pub fn percent(confidence: f64) -> f64 {
    (confidence * 1000.0).round() / 10.0
}

/// Format an ISO-8601 timestamp as `Oct 18, 2026, 09:30 AM`.
///
/// Timestamps that do not parse are returned unchanged.
pub fn format_timestamp(timestamp: &str) -> String {
    const FORMAT: &str = "%b %-d, %Y, %I:%M %p";

    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return dt.format(FORMAT).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(FORMAT).to_string();
    }
    timestamp.to_string()
}

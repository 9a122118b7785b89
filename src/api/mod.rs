//! HTTP client for the plant disease inference service
//!
//! Endpoints (all under `<base_url>/api`):
//! - `POST /predictions/predict` - multipart upload, one `file` field
//! - `GET  /predictions/history?limit=N&skip=M`
//! - `GET  /health`
//! - `GET  /`
//!
//! Every call is a single attempt. Retrying is the caller's decision.

pub mod error;
pub mod types;

pub use error::{FetchError, TransportError};
pub use types::{
    HealthStatus, HistoryPage, HistoryRecord, PredictionResponse, RankedPrediction, ServiceInfo,
    HEALTHY_LABEL,
};

use crate::core::candidate::CandidateFile;
use crate::core::traits::{HistorySource, PredictionTransport};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

const API_PREFIX: &str = "/api";

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the service at `base_url`.
    ///
    /// The `/api` prefix is appended unless the URL already ends with it.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = if trimmed.ends_with(API_PREFIX) {
            trimmed.to_string()
        } else {
            format!("{}{}", trimmed, API_PREFIX)
        };
        Self { client, base_url }
    }

    /// Base URL including the `/api` prefix
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Upload a candidate and wait for the diagnosis
    pub async fn predict(&self, file: &CandidateFile) -> Result<PredictionResponse, TransportError> {
        let url = self.endpoint("/predictions/predict");

        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.media_type())
            .map_err(TransportError::from_network_error)?;
        let form = Form::new().part("file", part);

        tracing::debug!(
            "Submitting {} ({} bytes) to {}",
            file.name(),
            file.size(),
            url
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(TransportError::from_network_error)?;

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                return Err(TransportError::MalformedResponse(e.to_string()));
            }
            Err(e) => {
                tracing::warn!("Failed to read {} response body: {}", status, e);
                return Err(TransportError::from_status(status, ""));
            }
        };

        if !status.is_success() {
            tracing::warn!("Prediction request failed with {}: {}", status, body);
            return Err(TransportError::from_status(status, &body));
        }

        let prediction: PredictionResponse = serde_json::from_str(&body)
            .map_err(|e| TransportError::MalformedResponse(e.to_string()))?;

        if !(0.0..=1.0).contains(&prediction.confidence) {
            return Err(TransportError::MalformedResponse(format!(
                "confidence {} out of range",
                prediction.confidence
            )));
        }

        tracing::info!(
            "Prediction {}: {} ({:.4})",
            prediction.prediction_id,
            prediction.predicted_disease,
            prediction.confidence
        );
        Ok(prediction)
    }

    /// List past predictions, most recent first
    pub async fn history(&self, limit: usize, skip: usize) -> Result<HistoryPage, FetchError> {
        let url = self.endpoint("/predictions/history");
        let request = self
            .client
            .get(&url)
            .query(&[("limit", limit), ("skip", skip)]);
        self.get_json("history", request).await
    }

    /// Probe the service health endpoint
    pub async fn health(&self) -> Result<HealthStatus, FetchError> {
        let request = self.client.get(self.endpoint("/health"));
        self.get_json("health", request).await
    }

    /// Fetch the service banner (name and version)
    pub async fn service_info(&self) -> Result<ServiceInfo, FetchError> {
        let request = self.client.get(self.endpoint("/"));
        self.get_json("service info", request).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, FetchError> {
        let response = request
            .send()
            .await
            .map_err(|e| FetchError::from_network_error(resource, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Fetching {} failed with {}", resource, status);
            return Err(FetchError::Status {
                resource,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Malformed {
            resource,
            message: e.to_string(),
        })?;
        serde_json::from_str(&body).map_err(|e| FetchError::Malformed {
            resource,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl PredictionTransport for ApiClient {
    async fn submit(&self, file: &CandidateFile) -> Result<PredictionResponse, TransportError> {
        self.predict(file).await
    }
}

#[async_trait]
impl HistorySource for ApiClient {
    async fn fetch_history(&self, limit: usize, skip: usize) -> Result<HistoryPage, FetchError> {
        self.history(limit, skip).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_api_prefix() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(
            client.endpoint("/predictions/predict"),
            "http://localhost:8000/api/predictions/predict"
        );
    }

    #[test]
    fn test_existing_api_prefix_kept() {
        let client = ApiClient::new("https://scan.example.com/api");
        assert_eq!(client.base_url(), "https://scan.example.com/api");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_upload_error() {
        // Reserve a port, then release it so nothing is listening there
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = ApiClient::new(&format!("http://127.0.0.1:{}", port));
        let file = CandidateFile::new("leaf.png", "image/png", vec![0u8; 16]);
        let err = client.predict(&file).await.unwrap_err();
        assert!(matches!(err, TransportError::Upload(_)));
        assert_eq!(err.to_string(), "failed to upload and process image");
    }
}

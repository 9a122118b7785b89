//! In-process mock of the inference service

#![allow(dead_code)]

use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::{header, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// What the mock saw of the last upload
#[derive(Debug, Clone, Default)]
pub struct SeenUpload {
    pub field: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
}

/// Canned response plus everything the mock observed
#[derive(Clone)]
pub struct MockService {
    pub predict_status: StatusCode,
    pub predict_body: String,
    pub history_status: StatusCode,
    pub history_body: String,
    pub uploads: Arc<Mutex<Vec<SeenUpload>>>,
    pub history_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl Default for MockService {
    fn default() -> Self {
        Self {
            predict_status: StatusCode::OK,
            predict_body: healthy_prediction().to_string(),
            history_status: StatusCode::OK,
            history_body: json!({ "total": 0, "results": [] }).to_string(),
            uploads: Arc::default(),
            history_queries: Arc::default(),
        }
    }
}

impl MockService {
    pub fn predict(mut self, status: StatusCode, body: impl Into<String>) -> Self {
        self.predict_status = status;
        self.predict_body = body.into();
        self
    }

    pub fn history(self, status: StatusCode, body: Value) -> Self {
        self.history_text(status, body.to_string())
    }

    /// History response with a raw body, served as JSON regardless of content
    pub fn history_text(mut self, status: StatusCode, body: impl Into<String>) -> Self {
        self.history_status = status;
        self.history_body = body.into();
        self
    }

    /// Serve on an ephemeral localhost port and return the base URL
    pub async fn spawn(self) -> String {
        let router = Router::new()
            .route("/api/", get(service_info))
            .route("/api/health", get(health))
            .route("/api/predictions/predict", post(predict))
            .route("/api/predictions/history", get(history))
            .layer(DefaultBodyLimit::max(30 * 1024 * 1024))
            .with_state(self);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }
}

pub fn healthy_prediction() -> Value {
    json!({
        "prediction_id": "5f1c",
        "filename": "leaf.jpg",
        "predicted_disease": "Healthy",
        "confidence": 0.95,
        "all_predictions": [
            {"class": "Healthy", "confidence": 0.95},
            {"class": "Blight", "confidence": 0.05}
        ],
        "timestamp": "2026-10-18T09:30:00+00:00"
    })
}

pub fn history_record(disease: &str, confidence: f64) -> Value {
    json!({
        "prediction_id": format!("{}-{}", disease, confidence),
        "filename": "leaf.jpg",
        "predicted_disease": disease,
        "confidence": confidence,
        "all_predictions": [],
        "timestamp": "2026-10-18T09:30:00+00:00",
        "model_version": "1.0"
    })
}

async fn predict(State(mock): State<MockService>, mut multipart: Multipart) -> (StatusCode, String) {
    while let Ok(Some(field)) = multipart.next_field().await {
        let mut seen = SeenUpload {
            field: field.name().unwrap_or_default().to_string(),
            filename: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
            size: 0,
        };
        seen.size = field.bytes().await.map(|b| b.len()).unwrap_or(0);
        mock.uploads.lock().unwrap().push(seen);
    }
    (mock.predict_status, mock.predict_body.clone())
}

async fn history(
    State(mock): State<MockService>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    mock.history_queries.lock().unwrap().push(query);
    (
        mock.history_status,
        [(header::CONTENT_TYPE, "application/json")],
        mock.history_body.clone(),
    )
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "AgriScan AI",
        "timestamp": "2026-10-18T09:30:00+00:00"
    }))
}

async fn service_info() -> Json<Value> {
    Json(json!({
        "message": "AgriScan AI - Plant Disease Detection API",
        "version": "1.0"
    }))
}

/// Serve one request, answering with `status` and a body cut short of its
/// declared length before closing the connection
pub async fn spawn_truncated(status: u16) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
        let head = format!(
            "HTTP/1.1 {} Cut\r\nContent-Type: application/json\r\nContent-Length: 512\r\nConnection: close\r\n\r\n{{\"predicted",
            status
        );
        let _ = socket.write_all(head.as_bytes()).await;
        let _ = socket.shutdown().await;
    });
    format!("http://{}", addr)
}

async fn read_request(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 16 * 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
        let body = &buf[end + 4..];
        let content_length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok());

        let complete = match content_length {
            Some(len) => body.len() >= len,
            None if head.contains("transfer-encoding: chunked") => body.ends_with(b"0\r\n\r\n"),
            None => true,
        };
        if complete {
            return;
        }
    }
}

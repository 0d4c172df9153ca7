use std::sync::Arc;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::classifier::{Classifier, ClassifierError};

pub const SERVICE_NAME: &str = "civic-saathi-ai";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub tag: String,
    pub department: String,
    pub confidence: f64,
}

/// Maps request and classifier failures onto HTTP responses with a
/// `detail` body.
#[derive(Debug)]
pub enum ApiError {
    /// The request body is not an `AnalyzeRequest`
    Request(JsonRejection),
    Classifier(ClassifierError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Request(rejection)
    }
}

impl From<ClassifierError> for ApiError {
    fn from(err: ClassifierError) -> Self {
        Self::Classifier(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::Request(rejection) => (rejection.status(), rejection.body_text()),
            Self::Classifier(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

async fn analyze_issue(
    State(classifier): State<Arc<Classifier>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        log::warn!("Rejected analyze-issue request: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;

    let analysis = classifier.classify(&request.description).await.map_err(|e| {
        log::error!("Failed to analyze issue: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(AnalyzeResponse {
        tag: analysis.tag,
        department: analysis.department,
        confidence: analysis.confidence,
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": SERVICE_NAME }))
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Civic Saathi AI Service is live. Send POST requests to /analyze-issue"
    }))
}

pub fn router(classifier: Arc<Classifier>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/analyze-issue", post(analyze_issue))
        .with_state(classifier)
}

/// Serves the API on an already bound listener until the process stops.
pub async fn serve(listener: TcpListener, classifier: Arc<Classifier>) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("Listening on {}", addr);
    }
    axum::serve(listener, router(classifier)).await
}

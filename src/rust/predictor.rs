use std::time::Duration;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::runtime::RuntimeConfig;

#[derive(Debug, thiserror::Error)]
pub enum PredictorError {
    #[error("No API credential configured for the label predictor")]
    MissingCredential,
    #[error("No label predictor configured")]
    NotConfigured,
    #[error("Predictor returned {status}: {message}")]
    Status {
        status: u16,
        message: String,
    },
    #[error("Predictor did not respond within {0:?}")]
    Timeout(Duration),
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Malformed predictor response: {0}")]
    MalformedResponse(String),
}

/// A candidate label and the model's score for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// A zero-shot classification capability: ranks `candidate_labels` for `text`.
///
/// Implementations return labels highest-ranked first.
#[async_trait]
pub trait LabelPredictor: Send + Sync {
    async fn predict(&self, text: &str, candidate_labels: &[String]) -> Result<Vec<LabelScore>, PredictorError>;

    /// Whether the predictor has what it needs to authenticate its calls.
    fn has_credential(&self) -> bool {
        true
    }
}

#[derive(Debug, Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
    options: ZeroShotOptions,
}

#[derive(Debug, Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [String],
}

#[derive(Debug, Serialize)]
struct ZeroShotOptions {
    wait_for_model: bool,
}

/// The router returns a ranked list; the older inference API returned
/// parallel `labels`/`scores` arrays.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    Ranked(Vec<LabelScore>),
    Columnar {
        labels: Vec<String>,
        scores: Vec<f64>,
    },
}

impl ZeroShotResponse {
    fn into_ranking(self) -> Result<Vec<LabelScore>, PredictorError> {
        let ranking = match self {
            Self::Ranked(ranking) => ranking,
            Self::Columnar { labels, scores } => {
                if labels.len() != scores.len() {
                    return Err(PredictorError::MalformedResponse(format!(
                        "{} labels but {} scores", labels.len(), scores.len()
                    )));
                }
                labels.into_iter()
                    .zip(scores)
                    .map(|(label, score)| LabelScore { label, score })
                    .collect()
            }
        };
        if ranking.is_empty() {
            return Err(PredictorError::MalformedResponse("empty ranking".into()));
        }
        Ok(ranking)
    }
}

/// Zero-shot predictor backed by the Hugging Face inference router.
#[derive(Debug, Clone)]
pub struct HuggingFacePredictor {
    client: reqwest::Client,
    api_url: String,
    api_token: Option<String>,
    timeout: Duration,
}

impl HuggingFacePredictor {
    pub fn new(
        api_url: impl Into<String>,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, PredictorError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            api_token: api_token.filter(|t| !t.trim().is_empty()),
            timeout,
        })
    }

    pub fn from_config(config: &RuntimeConfig) -> Result<Self, PredictorError> {
        Self::new(config.api_url.clone(), config.api_token.clone(), config.timeout)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn error_message(body: &str) -> String {
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => value.get("error")
                .and_then(|e| e.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| "Unknown API Error".to_string()),
            Err(_) if !body.trim().is_empty() => body.trim().to_string(),
            Err(_) => "Unknown API Error".to_string(),
        }
    }

    fn map_request_error(&self, err: reqwest::Error) -> PredictorError {
        if err.is_timeout() {
            PredictorError::Timeout(self.timeout)
        } else {
            PredictorError::Request(err)
        }
    }
}

#[async_trait]
impl LabelPredictor for HuggingFacePredictor {
    async fn predict(&self, text: &str, candidate_labels: &[String]) -> Result<Vec<LabelScore>, PredictorError> {
        let token = self.api_token.as_deref().ok_or(PredictorError::MissingCredential)?;

        let payload = ZeroShotRequest {
            inputs: text,
            parameters: ZeroShotParameters { candidate_labels },
            options: ZeroShotOptions { wait_for_model: true },
        };

        log::info!("Requesting zero-shot prediction over {} labels from {}", candidate_labels.len(), self.api_url);
        let response = self.client
            .post(&self.api_url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        log::info!("Predictor response status: {}", status);
        let body = response.text().await.map_err(|e| self.map_request_error(e))?;

        if !status.is_success() {
            return Err(PredictorError::Status {
                status: status.as_u16(),
                message: Self::error_message(&body),
            });
        }

        let parsed: ZeroShotResponse = serde_json::from_str(&body)
            .map_err(|e| PredictorError::MalformedResponse(e.to_string()))?;
        parsed.into_ranking()
    }

    fn has_credential(&self) -> bool {
        self.api_token.is_some()
    }
}

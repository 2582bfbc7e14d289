//! Ranker client — the single point of entry for calls to the advisory
//! ranking service.
//!
//! The service is a best-effort enrichment collaborator: it prioritizes
//! missing keywords and explains how to address them. Every call is bounded
//! by a timeout and its response is validated before it reaches callers.
//! No other module may talk to the ranking service directly.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RankError {
    #[error("ranking request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("ranking service returned status {status}")]
    Api { status: u16 },

    #[error("ranking response failed validation: {0}")]
    Schema(String),
}

/// Payload sent to the ranking service. Field names follow its wire contract.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankRequest {
    pub jd_text: String,
    pub resume_text: String,
    pub candidates: Vec<String>,
    pub top_k: usize,
}

/// One ranked keyword with optional guidance, as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceItem {
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why_important: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how_to_improve: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankResponse {
    ranked_important: Vec<AdviceItem>,
}

/// The advisory ranker seam. Carried in `AppState` as
/// `Arc<dyn AdvisoryRanker>` so the orchestrator can be exercised against
/// mock implementations.
#[async_trait]
pub trait AdvisoryRanker: Send + Sync {
    async fn rank(&self, request: &RankRequest) -> Result<Vec<AdviceItem>, RankError>;
}

/// Production ranker backed by the external HTTP service. Makes exactly one
/// attempt per `rank` call; the retry policy belongs to the orchestrator.
pub struct HttpRanker {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpRanker {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url,
            timeout,
        }
    }
}

#[async_trait]
impl AdvisoryRanker for HttpRanker {
    async fn rank(&self, request: &RankRequest) -> Result<Vec<AdviceItem>, RankError> {
        let url = format!("{}/llm/rank", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RankError::Api {
                status: status.as_u16(),
            });
        }

        let body: RankResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                RankError::Timeout
            } else {
                RankError::Schema(e.to_string())
            }
        })?;

        validate_advice(&body.ranked_important)?;

        debug!(
            "ranking service returned {} advice items",
            body.ranked_important.len()
        );
        Ok(body.ranked_important)
    }
}

fn classify_transport(e: reqwest::Error) -> RankError {
    if e.is_timeout() {
        RankError::Timeout
    } else {
        RankError::Http(e)
    }
}

/// Structural checks beyond what serde enforces: keywords must be non-empty
/// and importance, when present, must sit in [0, 1].
fn validate_advice(items: &[AdviceItem]) -> Result<(), RankError> {
    for item in items {
        if item.keyword.trim().is_empty() {
            return Err(RankError::Schema(
                "advice item has an empty keyword".to_string(),
            ));
        }
        if let Some(importance) = item.importance {
            if !(0.0..=1.0).contains(&importance) {
                return Err(RankError::Schema(format!(
                    "importance {importance} out of range for keyword '{}'",
                    item.keyword
                )));
            }
        }
    }
    Ok(())
}

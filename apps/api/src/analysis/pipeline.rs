//! Analysis orchestration: extract → score → optional advisory ranking.
//!
//! The deterministic score always runs and is always returned; the ranking
//! call is best-effort enrichment whose failures only ever degrade
//! `llmStatus`. That decoupling is the central reliability property of the
//! pipeline.

use serde::Serialize;
use tracing::warn;

use crate::analysis::keywords::extract_candidate_keywords;
use crate::analysis::scoring::score_resume_against_keywords;
use crate::ranker::{AdviceItem, AdvisoryRanker, RankError, RankRequest};

pub const DEFAULT_TOP_K: usize = 20;
pub const MIN_TOP_K: usize = 5;
pub const MAX_TOP_K: usize = 50;

/// One immediate retry and no more: the deterministic score must still
/// return promptly.
const RANK_ATTEMPTS: u32 = 2;

/// Outcome of the advisory ranking step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmStatus {
    Ok,
    Timeout,
    Error,
    Skipped,
}

/// Final analysis payload. Constructed once per request, never persisted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub match_percent: u32,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub ranked_important: Vec<AdviceItem>,
    pub llm_status: LlmStatus,
}

#[derive(Debug, Clone, Copy)]
pub struct AnalyzeOptions {
    pub top_k: usize,
    pub use_llm: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            use_llm: true,
        }
    }
}

/// Runs the full analysis pipeline for one request.
pub async fn analyze(
    ranker: &dyn AdvisoryRanker,
    resume_text: &str,
    jd_text: &str,
    options: AnalyzeOptions,
) -> AnalysisResult {
    // Handlers validate already; short-circuit anyway so nothing downstream
    // sees empty text.
    if resume_text.trim().is_empty() || jd_text.trim().is_empty() {
        return AnalysisResult {
            match_percent: 0,
            matched_keywords: Vec::new(),
            missing_keywords: Vec::new(),
            ranked_important: Vec::new(),
            llm_status: LlmStatus::Skipped,
        };
    }

    let candidates = extract_candidate_keywords(jd_text);
    let important: Vec<String> = candidates.into_iter().take(options.top_k).collect();

    let scoring = score_resume_against_keywords(resume_text, &important);

    let mut ranked_important: Vec<AdviceItem> = Vec::new();
    let mut llm_status = LlmStatus::Skipped;

    // Advice only makes sense for keywords the resume is missing; an empty
    // candidate set would be a wasted call.
    if options.use_llm && !scoring.missing_keywords.is_empty() {
        let request = RankRequest {
            jd_text: jd_text.to_string(),
            resume_text: resume_text.to_string(),
            candidates: scoring.missing_keywords.clone(),
            top_k: options.top_k,
        };

        match rank_with_retry(ranker, &request).await {
            Ok(items) => {
                ranked_important = items;
                llm_status = LlmStatus::Ok;
            }
            Err(RankError::Timeout) => llm_status = LlmStatus::Timeout,
            Err(_) => llm_status = LlmStatus::Error,
        }
    }

    AnalysisResult {
        match_percent: scoring.match_percent,
        matched_keywords: scoring.matched_keywords,
        missing_keywords: scoring.missing_keywords,
        ranked_important,
        llm_status,
    }
}

/// Bounded attempt loop over the ranker: at most `RANK_ATTEMPTS` calls, no
/// backoff. The last failure wins for status classification.
async fn rank_with_retry(
    ranker: &dyn AdvisoryRanker,
    request: &RankRequest,
) -> Result<Vec<AdviceItem>, RankError> {
    let mut last_error: Option<RankError> = None;

    for attempt in 1..=RANK_ATTEMPTS {
        match ranker.rank(request).await {
            Ok(items) => return Ok(items),
            Err(e) => {
                if attempt < RANK_ATTEMPTS {
                    warn!("ranking attempt {attempt} failed ({e}), retrying once");
                }
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or(RankError::Schema(
        "ranking produced no result".to_string(),
    )))
}

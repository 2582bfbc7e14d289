//! Axum route handler for the Analysis API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::analysis::pipeline::{
    analyze, AnalysisResult, AnalyzeOptions, DEFAULT_TOP_K, MAX_TOP_K, MIN_TOP_K,
};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeBody {
    pub resume_text: String,
    pub jd_text: String,
    #[serde(default)]
    pub options: Option<AnalyzeBodyOptions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeBodyOptions {
    pub top_k: Option<usize>,
    pub use_llm: Option<bool>,
}

/// POST /api/analyze
///
/// Deterministic keyword extraction and coverage scoring, plus optional
/// best-effort ranking advice for whatever the resume is missing.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeBody>,
) -> Result<Json<AnalysisResult>, AppError> {
    if body.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resumeText cannot be empty".to_string(),
        ));
    }
    if body.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jdText cannot be empty".to_string()));
    }

    let options = body.options.unwrap_or_default();
    let top_k = options.top_k.unwrap_or(DEFAULT_TOP_K);
    if !(MIN_TOP_K..=MAX_TOP_K).contains(&top_k) {
        return Err(AppError::Validation(format!(
            "topK must be between {MIN_TOP_K} and {MAX_TOP_K}"
        )));
    }
    let use_llm = options.use_llm.unwrap_or(true);

    let result = analyze(
        state.ranker.as_ref(),
        &body.resume_text,
        &body.jd_text,
        AnalyzeOptions { top_k, use_llm },
    )
    .await;

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ranker::{AdviceItem, AdvisoryRanker, RankError, RankRequest};
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Ranker that succeeds with empty advice; these tests target request
    /// validation, not the pipeline.
    struct StubRanker;

    #[async_trait]
    impl AdvisoryRanker for StubRanker {
        async fn rank(&self, _request: &RankRequest) -> Result<Vec<AdviceItem>, RankError> {
            Ok(Vec::new())
        }
    }

    fn test_state() -> AppState {
        AppState {
            config: Config {
                host: "127.0.0.1".to_string(),
                port: 0,
                ranker_url: "http://localhost:0".to_string(),
                ranker_timeout_ms: 1,
                rust_log: "info".to_string(),
            },
            ranker: Arc::new(StubRanker),
        }
    }

    fn body(resume: &str, jd: &str, top_k: Option<usize>) -> AnalyzeBody {
        AnalyzeBody {
            resume_text: resume.to_string(),
            jd_text: jd.to_string(),
            options: Some(AnalyzeBodyOptions {
                top_k,
                use_llm: Some(false),
            }),
        }
    }

    #[tokio::test]
    async fn test_empty_resume_text_is_rejected() {
        let result = handle_analyze(State(test_state()), Json(body("", "Python", None))).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_whitespace_only_text_is_rejected() {
        let result =
            handle_analyze(State(test_state()), Json(body("  \n\t ", "Python", None))).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result =
            handle_analyze(State(test_state()), Json(body("my resume", "   ", None))).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_top_k_below_range_is_rejected() {
        let result =
            handle_analyze(State(test_state()), Json(body("python dev", "Python", Some(4)))).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_top_k_above_range_is_rejected() {
        let result = handle_analyze(
            State(test_state()),
            Json(body("python dev", "Python", Some(51))),
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_top_k_boundaries_are_accepted() {
        for top_k in [5, 50] {
            let result = handle_analyze(
                State(test_state()),
                Json(body("python dev", "Python required", Some(top_k))),
            )
            .await;
            let Json(analysis) = result.expect("boundary topK must be accepted");
            assert_eq!(analysis.match_percent, 100);
        }
    }

    #[test]
    fn test_analyze_body_deserializes_minimal_request() {
        let json = r#"{"resumeText": "my resume", "jdText": "the jd"}"#;
        let body: AnalyzeBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.resume_text, "my resume");
        assert_eq!(body.jd_text, "the jd");
        assert!(body.options.is_none());
    }

    #[test]
    fn test_analyze_body_deserializes_options() {
        let json = r#"{
            "resumeText": "r",
            "jdText": "j",
            "options": {"topK": 10, "useLlm": false}
        }"#;
        let body: AnalyzeBody = serde_json::from_str(json).unwrap();
        let options = body.options.unwrap();
        assert_eq!(options.top_k, Some(10));
        assert_eq!(options.use_llm, Some(false));
    }

    #[test]
    fn test_partial_options_leave_other_fields_defaultable() {
        let json = r#"{"resumeText": "r", "jdText": "j", "options": {"topK": 25}}"#;
        let body: AnalyzeBody = serde_json::from_str(json).unwrap();
        let options = body.options.unwrap();
        assert_eq!(options.top_k, Some(25));
        assert!(options.use_llm.is_none());
    }
}

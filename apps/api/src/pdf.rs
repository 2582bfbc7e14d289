//! PDF → text extraction for the parse-resume endpoint.
//!
//! The endpoint accepts a multipart upload (`resumePdf` field), extracts the
//! text layer, and returns normalized text for later use with /api/analyze.
//! Scanned PDFs with no text layer surface as a 422, not a server error.

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::Json;
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;

/// Below this many extracted characters the PDF is likely scanned or the
/// parse silently failed.
const MIN_EXTRACTED_CHARS: usize = 200;

/// Upload size cap. The router's body limit is set slightly above this.
pub const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;

static HORIZONTAL_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").expect("valid pattern"));
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid pattern"));

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResumeResponse {
    pub resume_text: String,
    pub meta: ParseResumeMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResumeMeta {
    pub filename: Option<String>,
    pub extracted_chars: usize,
}

/// POST /api/parse-resume
///
/// Expects multipart/form-data with a single `resumePdf` file field.
pub async fn handle_parse_resume(
    mut multipart: Multipart,
) -> Result<Json<ParseResumeResponse>, AppError> {
    let mut pdf_bytes: Option<Bytes> = None;
    let mut filename: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(map_multipart_err)? {
        if field.name() == Some("resumePdf") {
            filename = field.file_name().map(str::to_string);
            let bytes = field.bytes().await.map_err(map_multipart_err)?;
            pdf_bytes = Some(bytes);
            break;
        }
    }

    let pdf_bytes = pdf_bytes.ok_or_else(|| {
        AppError::Validation("missing resumePdf file field (multipart/form-data)".to_string())
    })?;

    if pdf_bytes.len() > MAX_PDF_BYTES {
        return Err(payload_too_large());
    }

    debug!(
        "extracting text from PDF ({} bytes, filename: {filename:?})",
        pdf_bytes.len()
    );

    // pdf-extract is CPU-bound; keep it off the async worker threads.
    let resume_text = tokio::task::spawn_blocking(move || extract_pdf_text(&pdf_bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))?
        .map_err(|_| {
            AppError::UnprocessableEntity(
                "Failed to parse PDF. Try a different PDF or provide resume text manually."
                    .to_string(),
            )
        })?;

    let extracted_chars = extracted_char_count(&resume_text);
    if extracted_chars < MIN_EXTRACTED_CHARS {
        return Err(AppError::UnprocessableEntity(
            "Could not extract enough text from PDF. If this is a scanned PDF, \
             please upload a text-based PDF or provide text manually."
                .to_string(),
        ));
    }

    Ok(Json(ParseResumeResponse {
        resume_text,
        meta: ParseResumeMeta {
            filename,
            extracted_chars,
        },
    }))
}

/// One 413 shape for every oversize path, whether the handler's own size
/// check fires or the router's body limit trips inside multipart reading.
fn map_multipart_err(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        payload_too_large()
    } else {
        AppError::Validation(format!("invalid multipart body: {e}"))
    }
}

fn payload_too_large() -> AppError {
    AppError::PayloadTooLarge("resumePdf exceeds the 10MB upload limit".to_string())
}

/// Character count, not byte length. Extracted resume text routinely carries
/// non-ASCII bullets and accented names, and the scanned-PDF threshold is
/// defined in characters.
fn extracted_char_count(text: &str) -> usize {
    text.chars().count()
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, pdf_extract::OutputError> {
    let raw = pdf_extract::extract_text_from_mem(bytes)?;
    Ok(normalize_text(&raw))
}

/// Folds CRLF to LF, collapses horizontal whitespace, and caps blank-line
/// runs at one so downstream matching sees predictable text.
pub fn normalize_text(s: &str) -> String {
    let unified = s.replace('\r', "\n");
    let collapsed = HORIZONTAL_WS.replace_all(&unified, " ");
    EXCESS_NEWLINES
        .replace_all(&collapsed, "\n\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;

    async fn multipart_with(field_name: &str, data: &[u8]) -> Multipart {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--BOUNDARY\r\nContent-Disposition: form-data; name=\"{field_name}\"; \
                 filename=\"resume.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n--BOUNDARY--\r\n");

        let request = Request::builder()
            .header("content-type", "multipart/form-data; boundary=BOUNDARY")
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_field_is_a_validation_error() {
        let multipart = multipart_with("somethingElse", b"data").await;
        let result = handle_parse_resume(multipart).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_oversize_pdf_maps_to_payload_too_large() {
        let data = vec![0u8; MAX_PDF_BYTES + 1];
        let multipart = multipart_with("resumePdf", &data).await;
        let result = handle_parse_resume(multipart).await;
        assert!(matches!(result, Err(AppError::PayloadTooLarge(_))));
    }

    #[tokio::test]
    async fn test_garbage_bytes_map_to_unprocessable() {
        let multipart = multipart_with("resumePdf", b"definitely not a pdf").await;
        let result = handle_parse_resume(multipart).await;
        assert!(matches!(result, Err(AppError::UnprocessableEntity(_))));
    }

    #[test]
    fn test_extracted_char_count_is_characters_not_bytes() {
        let text = "• résumé";
        assert_eq!(extracted_char_count(text), 8);
        assert!(text.len() > 8);
    }

    #[test]
    fn test_normalize_folds_crlf() {
        assert_eq!(normalize_text("a\r\nb"), "a\n\nb");
        assert_eq!(normalize_text("a\rb"), "a\nb");
    }

    #[test]
    fn test_normalize_collapses_horizontal_whitespace() {
        assert_eq!(normalize_text("a  \t  b"), "a b");
    }

    #[test]
    fn test_normalize_caps_blank_line_runs() {
        assert_eq!(normalize_text("a\n\n\n\n\nb"), "a\n\nb");
        // A single blank line is preserved.
        assert_eq!(normalize_text("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_normalize_trims_edges() {
        assert_eq!(normalize_text("  \n hello \n  "), "hello");
    }

    #[test]
    fn test_normalize_empty_input() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \t \n "), "");
    }
}

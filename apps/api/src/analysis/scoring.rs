//! Coverage scoring — partitions a keyword list into matched/missing against
//! resume text, using boundary-aware phrase matching with alias handling.
//!
//! Pure and deterministic: no network calls, no randomness. The historical
//! substring-containment variant is gone; "java" never gets credit for
//! "javascript".

use once_cell::sync::Lazy;
use regex::Regex;

/// Report caps. The percentage is computed on pre-truncation counts.
const MAX_REPORTED: usize = 50;

/// Role nouns that never earn match credit, even when literally present.
/// Generic terms like "engineer" appear in virtually every resume and would
/// only inflate the score.
const SCORER_NOISE: &[&str] = &[
    "software",
    "engineer",
    "engineering",
    "intern",
    "internship",
    "developer",
    "development",
];

static NODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bnode(\.?js)?\b").expect("valid pattern"));

static REST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\brest\b|restful|rest\s+api").expect("valid pattern"));

static HORIZONTAL_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").expect("valid pattern"));

fn matches_node_alias(resume: &str) -> bool {
    NODE_RE.is_match(resume)
}

fn matches_rest_alias(resume: &str) -> bool {
    REST_RE.is_match(resume)
}

/// Alias groups, checked before the generic phrase matcher. Each maps a set
/// of equivalent keyword spellings to one predicate over the normalized
/// resume. Extend here rather than branching inside `matches_keyword`.
static ALIAS_GROUPS: &[(&[&str], fn(&str) -> bool)] = &[
    (&["node", "nodejs", "node.js"], matches_node_alias),
    (&["rest", "rest api", "restful"], matches_rest_alias),
];

/// Matched/missing partition of an input keyword list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringResult {
    pub match_percent: u32,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
}

/// Lower-cases the resume, folds CRLF to LF, and collapses horizontal
/// whitespace so phrase patterns see a predictable layout.
fn normalize_resume(text: &str) -> String {
    let lowered = text.to_lowercase().replace('\r', "\n");
    HORIZONTAL_WS.replace_all(&lowered, " ").trim().to_string()
}

fn matches_keyword(resume: &str, keyword: &str) -> bool {
    let keyword = keyword.to_lowercase();
    let keyword = keyword.trim();
    if keyword.is_empty() || SCORER_NOISE.contains(&keyword) {
        return false;
    }

    for (aliases, predicate) in ALIAS_GROUPS {
        if aliases.contains(&keyword) {
            return predicate(resume);
        }
    }

    // Short tokens (sql, aws, ...) need strict word boundaries; longer
    // keywords match as phrases with flexible internal whitespace. Both are
    // bounded by non-word characters or string edges.
    let escaped = regex::escape(keyword);
    let pattern = if keyword.len() <= 3 {
        format!(r"(?i)(^|\W){escaped}(\W|$)")
    } else {
        let phrase = HORIZONTAL_WS.replace_all(&escaped, r"\s+");
        format!(r"(?i)(^|\W){phrase}(\W|$)")
    };

    Regex::new(&pattern)
        .map(|re| re.is_match(resume))
        .unwrap_or(false)
}

/// Scores the resume's textual coverage of `keywords`. Keywords keep their
/// input order within each partition; both reported lists are capped at 50.
pub fn score_resume_against_keywords(resume_text: &str, keywords: &[String]) -> ScoringResult {
    let resume = normalize_resume(resume_text);

    let mut matched: Vec<String> = Vec::new();
    let mut missing: Vec<String> = Vec::new();

    for keyword in keywords {
        if matches_keyword(&resume, keyword) {
            matched.push(keyword.clone());
        } else {
            missing.push(keyword.clone());
        }
    }

    let denom = keywords.len().max(1);
    let match_percent = ((matched.len() as f64 / denom as f64) * 100.0).round() as u32;

    matched.truncate(MAX_REPORTED);
    missing.truncate(MAX_REPORTED);

    ScoringResult {
        match_percent,
        matched_keywords: matched,
        missing_keywords: missing,
    }
}

//! Candidate keyword extraction — pulls skill keywords out of raw JD prose.
//!
//! Two-stage pipeline with an explicit short-circuit:
//! 1. High-precision pass against a curated skills dictionary.
//! 2. Fallback pass (only when the dictionary finds nothing): stopword-filtered
//!    generic tokens. Mixing the two would let junk tokens dilute real skills,
//!    so a non-empty dictionary result suppresses the fallback entirely.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Hard cap on candidates returned by either pass.
const MAX_CANDIDATES: usize = 200;

/// Minimum token length kept by the fallback pass.
const MIN_TOKEN_LEN: usize = 3;

/// Curated skills dictionary. Matches are reported in dictionary order,
/// not text order.
const SKILL_PHRASES: &[&str] = &[
    // Languages
    "typescript",
    "javascript",
    "python",
    "java",
    "c++",
    "c#",
    "c",
    "go",
    "golang",
    "rust",
    "sql",
    // Frontend
    "react",
    "next.js",
    "nextjs",
    "vue",
    "angular",
    "html",
    "css",
    "tailwind",
    // Backend / APIs
    "node.js",
    "nodejs",
    "node",
    "express",
    "fastify",
    "rest",
    "rest api",
    "restful",
    "graphql",
    // Databases
    "mysql",
    "postgres",
    "postgresql",
    "mongodb",
    "redis",
    // Cloud / DevOps
    "aws",
    "gcp",
    "google cloud",
    "azure",
    "docker",
    "kubernetes",
    "ci/cd",
    "github actions",
    // Testing
    "jest",
    "junit",
    "pytest",
];

/// Stopwords for the fallback pass: English function words plus role-noise
/// terms that carry no skill signal. Independent from the scorer's noise
/// list, which serves a different purpose.
const EXTRACTION_STOPWORDS: &[&str] = &[
    "the", "and", "or", "to", "of", "in", "for", "a", "an", "with", "on", "at", "by", "from",
    "is", "are", "as", "be", "will", "you", "we", "our", "your", "this", "that", "they", "their",
    "who", "what", "when", "where", "how", "can", "all", "any", "more", "most", "other", "some",
    "such", "than", "then", "these", "those", "into", "about", "need", "needs", "want", "loves",
    "love", "have", "has", "must", "software", "engineer", "engineering", "intern", "internship",
    "developer", "development", "come", "join", "company", "leading", "marketplace", "both",
    "marketing", "role", "team", "job", "work", "working", "ability", "skills", "skill",
    "experience",
];

struct SkillMatcher {
    name: &'static str,
    pattern: Regex,
}

/// Precompiled matcher per dictionary entry, in dictionary order.
static SKILL_MATCHERS: Lazy<Vec<SkillMatcher>> = Lazy::new(|| {
    SKILL_PHRASES
        .iter()
        .map(|&name| SkillMatcher {
            name,
            pattern: skill_pattern(name),
        })
        .collect()
});

static HORIZONTAL_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").expect("valid pattern"));

fn skill_pattern(skill: &str) -> Regex {
    let pattern = match skill {
        // One pattern for all node spellings: "node", "nodejs", "node.js".
        "node" | "nodejs" | "node.js" => r"\bnode(\.?js)?\b".to_string(),
        "ci/cd" => r"(?i)(ci\s*/\s*cd|cicd|continuous integration|continuous delivery)".to_string(),
        _ => format!(r"(?i)(^|\W){}(\W|$)", phrase_pattern(skill)),
    };
    Regex::new(&pattern).expect("skill dictionary patterns are valid")
}

/// Escapes a phrase for regex use, letting internal whitespace match any
/// whitespace run.
fn phrase_pattern(phrase: &str) -> String {
    HORIZONTAL_WS
        .replace_all(&regex::escape(phrase), r"\s+")
        .into_owned()
}

/// Lower-cases and strips the JD down to the `[a-z0-9+.#/ \n-]` alphabet,
/// collapsing runs of horizontal whitespace.
fn normalize_jd(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut cleaned = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        match c {
            'a'..='z' | '0'..='9' | '+' | '.' | '#' | '/' | ' ' | '\n' | '-' => cleaned.push(c),
            _ => cleaned.push(' '),
        }
    }
    HORIZONTAL_WS.replace_all(&cleaned, " ").trim().to_string()
}

/// Extracts an ordered, deduplicated list of candidate skill keywords from
/// free-text JD prose. Deterministic for identical input; size ≤ 200.
pub fn extract_candidate_keywords(jd_text: &str) -> Vec<String> {
    let text = normalize_jd(jd_text);
    if text.is_empty() {
        return Vec::new();
    }

    // 1) High-precision: dictionary skills.
    let mut seen: HashSet<&str> = HashSet::new();
    let mut skills: Vec<String> = Vec::new();

    for matcher in SKILL_MATCHERS.iter() {
        if matcher.pattern.is_match(&text) && seen.insert(matcher.name) {
            skills.push(matcher.name.to_string());
        }
    }

    if !skills.is_empty() {
        skills.truncate(MAX_CANDIDATES);
        return skills;
    }

    // 2) Fallback: filtered generic tokens. Degraded mode, not a failure.
    debug!("no dictionary skills found in JD, falling back to token extraction");

    let mut unique: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for token in text.replace('\n', " ").split_whitespace() {
        let token = token.trim_matches(|c: char| !c.is_ascii_alphanumeric());
        if token.len() < MIN_TOKEN_LEN || EXTRACTION_STOPWORDS.contains(&token) {
            continue;
        }
        if seen.insert(token.to_string()) {
            unique.push(token.to_string());
        }
        if unique.len() >= MAX_CANDIDATES {
            break;
        }
    }

    unique
}

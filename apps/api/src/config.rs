use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every value has a sensible local-development default.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Base URL of the advisory ranking service.
    pub ranker_url: String,
    /// Per-call deadline for the ranking service, in milliseconds.
    pub ranker_timeout_ms: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            host: env_or("HOST", "0.0.0.0"),
            port: env_or("PORT", "3000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            ranker_url: env_or("RANKER_URL", "http://localhost:8000"),
            ranker_timeout_ms: env_or("RANKER_TIMEOUT_MS", "9000")
                .parse::<u64>()
                .context("RANKER_TIMEOUT_MS must be a number of milliseconds")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

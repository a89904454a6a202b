use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// The embedding endpoint and LLM key are both optional: without an embedding
/// endpoint the service runs keyword/lexical-only, and without an LLM key the
/// reasoning enrichment is skipped.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Sentence-embedding inference endpoint (e.g. a local TEI server).
    pub embedding_url: Option<String>,
    /// Per-request timeout for embedding calls, in seconds.
    pub embedding_timeout_secs: u64,
    pub anthropic_api_key: Option<String>,
    /// JSON file with a string array of canonical skill labels; the built-in
    /// master list is used when unset.
    pub skill_vocab_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            embedding_url: optional_env("EMBEDDING_URL"),
            embedding_timeout_secs: std::env::var("EMBEDDING_TIMEOUT_SECS")
                .unwrap_or_else(|_| "20".to_string())
                .parse::<u64>()
                .context("EMBEDDING_TIMEOUT_SECS must be a positive integer")?,
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            skill_vocab_path: optional_env("SKILL_VOCAB_PATH"),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

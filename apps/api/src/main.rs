mod analysis;
mod config;
mod embedding;
mod errors;
mod ingest;
mod llm_client;
mod matching;
mod reasoning;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embedding::{CachedEmbedder, Embedder, HttpEmbedder};
use crate::ingest::store::ResumeStore;
use crate::llm_client::LlmClient;
use crate::matching::vocabulary::SkillVocabulary;
use crate::routes::build_router;
use crate::state::AppState;

/// Fallback filter when RUST_LOG is unset: `info` everywhere, the configured
/// level for this crate. Tracing targets use the crate's module path, so the
/// hyphen in the package name must become an underscore or the directive
/// never matches.
fn default_log_directive(rust_log: &str) -> String {
    format!(
        "info,{}={}",
        env!("CARGO_PKG_NAME").replace('-', "_"),
        rust_log
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_directive(&config.rust_log))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    // Skill vocabulary: external JSON file or the built-in master list.
    let vocabulary = Arc::new(match &config.skill_vocab_path {
        Some(path) => SkillVocabulary::from_json_file(path)?,
        None => SkillVocabulary::default(),
    });
    info!("Skill vocabulary loaded ({} labels)", vocabulary.len());

    // Embedding capability, wrapped with the label-embedding cache.
    let embedder: Option<Arc<dyn Embedder>> = match &config.embedding_url {
        Some(url) => {
            let http = HttpEmbedder::new(
                url.clone(),
                Duration::from_secs(config.embedding_timeout_secs),
            );
            info!("Embedding client initialized ({url})");
            Some(Arc::new(CachedEmbedder::new(Arc::new(http))))
        }
        None => {
            info!("EMBEDDING_URL not set; running keyword/lexical-only");
            None
        }
    };

    // Reasoning enrichment client.
    let llm = config.anthropic_api_key.clone().map(LlmClient::new);
    match &llm {
        Some(_) => info!("LLM client initialized (model: {})", llm_client::MODEL),
        None => info!("ANTHROPIC_API_KEY not set; skill reasoning disabled"),
    }

    let state = AppState {
        config: config.clone(),
        vocabulary,
        embedder,
        llm,
        resumes: Arc::new(ResumeStore::new()),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_directive_targets_module_path() {
        let directive = default_log_directive("debug");
        assert_eq!(directive, "info,screener_api=debug");
        assert!(!directive.contains('-'), "hyphenated targets never match");
    }

    #[test]
    fn test_default_log_directive_parses_as_env_filter() {
        let directive = default_log_directive("info");
        assert!(EnvFilter::try_new(&directive).is_ok(), "invalid directive: {directive}");
    }
}

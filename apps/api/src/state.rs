use std::sync::Arc;

use crate::config::Config;
use crate::embedding::Embedder;
use crate::ingest::store::ResumeStore;
use crate::llm_client::LlmClient;
use crate::matching::vocabulary::SkillVocabulary;

/// Shared application state injected into all route handlers via Axum
/// extractors. Everything here is read-only after startup except the resume
/// store, which guards itself.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Canonical skill labels, loaded once and shared by all evaluations.
    pub vocabulary: Arc<SkillVocabulary>,
    /// Injected embedding capability; `None` runs keyword/lexical-only.
    pub embedder: Option<Arc<dyn Embedder>>,
    /// Reasoning enrichment client; `None` disables enrichment.
    pub llm: Option<LlmClient>,
    pub resumes: Arc<ResumeStore>,
}

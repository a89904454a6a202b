//! Axum route handlers for the analysis API.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::batch::{analyze_batch, CandidateReport};
use crate::errors::AppError;
use crate::matching::evaluator::{evaluate, EvaluationRecord};
use crate::matching::extractor;
use crate::matching::vocabulary::SkillSet;
use crate::state::AppState;

/// Default semantic emphasis when the caller does not supply one.
const DEFAULT_SEMANTIC_WEIGHT: f64 = 0.85;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub jd_text: String,
    pub semantic_weight: Option<f64>,
    #[serde(default)]
    pub with_reasoning: bool,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub jd_skills: SkillSet,
    pub semantic_weight: f64,
    pub count: usize,
    pub ranking: Vec<CandidateReport>,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub jd_text: String,
    pub resume_text: String,
    pub semantic_weight: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub jd_skills: SkillSet,
    pub resume_skills: SkillSet,
    #[serde(flatten)]
    pub record: EvaluationRecord,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

fn validate_weight(weight: Option<f64>) -> Result<f64, AppError> {
    let weight = weight.unwrap_or(DEFAULT_SEMANTIC_WEIGHT);
    if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
        return Err(AppError::Validation(format!(
            "semantic_weight must be in [0, 1], got {weight}"
        )));
    }
    Ok(weight)
}

/// POST /api/v1/analyze — evaluates every stored resume against the job
/// description and returns the ranked results.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if request.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text must not be empty".to_string()));
    }
    let semantic_weight = validate_weight(request.semantic_weight)?;

    let resumes = state.resumes.list().await;
    if resumes.is_empty() {
        return Err(AppError::Validation(
            "no resumes uploaded; upload resumes before analyzing".to_string(),
        ));
    }

    let jd_skills = extractor::extract(
        &request.jd_text,
        &state.vocabulary,
        state.embedder.as_deref(),
    )
    .await;

    info!(
        resumes = resumes.len(),
        jd_skills = jd_skills.len(),
        semantic_weight,
        with_reasoning = request.with_reasoning,
        "starting batch analysis"
    );

    let ranking = analyze_batch(
        request.jd_text,
        jd_skills.clone(),
        resumes,
        semantic_weight,
        state.embedder.clone(),
        state.llm.clone(),
        request.with_reasoning,
    )
    .await?;

    Ok(Json(AnalyzeResponse {
        jd_skills,
        semantic_weight,
        count: ranking.len(),
        ranking,
    }))
}

/// POST /api/v1/evaluate — single inline JD/resume pair, no storage involved.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    let semantic_weight = validate_weight(request.semantic_weight)?;

    let embedder = state.embedder.as_deref();
    let jd_skills = extractor::extract(&request.jd_text, &state.vocabulary, embedder).await;
    let resume_skills =
        extractor::extract(&request.resume_text, &state.vocabulary, embedder).await;

    let record = evaluate(
        &request.jd_text,
        &jd_skills,
        &request.resume_text,
        &resume_skills,
        semantic_weight,
        embedder,
    )
    .await?;

    Ok(Json(EvaluateResponse {
        jd_skills,
        resume_skills,
        record,
    }))
}

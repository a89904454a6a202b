//! Score aggregator and the `evaluate` entry point — the single operation
//! the core exposes to its callers.

use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use crate::embedding::Embedder;
use crate::errors::AppError;
use crate::matching::similarity::{lexical_similarity, semantic_similarity};
use crate::matching::skill_gap::{resolve, resolve_semantic};
use crate::matching::vocabulary::SkillSet;

/// Backoff before the single retry of a failed semantic-similarity call.
const RETRY_BACKOFF: Duration = Duration::from_millis(200);

/// Diagnostics label recorded when the semantic sub-score was unavailable
/// and the final score fell back to lexical only.
pub const DEGRADED_SEMANTIC: &str = "semantic_similarity";

/// Immutable output of one resume evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRecord {
    /// TF-IDF cosine similarity, in [0, 1].
    pub lexical_score: f64,
    /// Embedding cosine similarity, typically in [0, 1]. Zero when degraded.
    pub semantic_score: f64,
    /// Weighted combination as a percentage, in [0, 100].
    pub final_score: f64,
    pub matched: SkillSet,
    pub missing: SkillSet,
    /// Sub-scores that could not be computed; empty for a full evaluation.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub degraded: Vec<String>,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// `(weight * semantic + (1 - weight) * lexical) * 100`, rounded to 2
/// decimals. Pure; trusts the caller's [0, 1] weight contract and passes
/// invalid inputs through rather than clamping.
pub fn aggregate(lexical: f64, semantic: f64, weight: f64) -> f64 {
    round2((weight * semantic + (1.0 - weight) * lexical) * 100.0)
}

/// Evaluates one resume against one job description.
///
/// The only hard failure is an out-of-range `semantic_weight`. Embedding
/// failures are retried once with backoff, then degrade: the final score
/// falls back to lexical only and the gap partition to direct matching,
/// with the loss recorded in `degraded`.
pub async fn evaluate(
    jd_text: &str,
    jd_skills: &SkillSet,
    resume_text: &str,
    resume_skills: &SkillSet,
    semantic_weight: f64,
    embedder: Option<&dyn Embedder>,
) -> Result<EvaluationRecord, AppError> {
    if !semantic_weight.is_finite() || !(0.0..=1.0).contains(&semantic_weight) {
        return Err(AppError::Validation(format!(
            "semantic_weight must be in [0, 1], got {semantic_weight}"
        )));
    }

    let lexical_score = lexical_similarity(jd_text, resume_text);

    let semantic_score = match embedder {
        Some(embedder) => semantic_with_retry(jd_text, resume_text, embedder).await,
        None => None,
    };

    let mut degraded = Vec::new();
    let (semantic_score, final_score) = match semantic_score {
        Some(score) => (score, aggregate(lexical_score, score, semantic_weight)),
        None => {
            degraded.push(DEGRADED_SEMANTIC.to_string());
            (0.0, round2(lexical_score * 100.0))
        }
    };

    let gap = match embedder {
        Some(embedder) => resolve_semantic(resume_skills, jd_skills, embedder).await,
        None => resolve(resume_skills, jd_skills),
    };

    Ok(EvaluationRecord {
        lexical_score,
        semantic_score,
        final_score,
        matched: gap.matched,
        missing: gap.missing,
        degraded,
    })
}

/// One retry with fixed backoff, then give up and let the caller degrade.
async fn semantic_with_retry(a: &str, b: &str, embedder: &dyn Embedder) -> Option<f64> {
    match semantic_similarity(a, b, embedder).await {
        Ok(score) => Some(score),
        Err(first) => {
            warn!("semantic similarity failed, retrying once: {first}");
            tokio::time::sleep(RETRY_BACKOFF).await;
            match semantic_similarity(a, b, embedder).await {
                Ok(score) => Some(score),
                Err(second) => {
                    warn!("semantic similarity failed after retry, degrading to lexical: {second}");
                    None
                }
            }
        }
    }
}

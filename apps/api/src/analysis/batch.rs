//! Concurrent batch evaluation.
//!
//! Each resume's pipeline is independent and stateless, so the batch is
//! embarrassingly parallel: evaluations run under a fixed-size semaphore with
//! read-only access to the shared vocabulary and embedder. Completion order
//! is irrelevant; results are ranked by final score afterwards.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::embedding::Embedder;
use crate::errors::AppError;
use crate::ingest::store::ResumeDoc;
use crate::llm_client::LlmClient;
use crate::matching::evaluator::{evaluate, EvaluationRecord};
use crate::matching::vocabulary::SkillSet;
use crate::reasoning::{explain_gaps, ReasoningMap};

/// Fixed evaluation pool size.
pub const MAX_CONCURRENT_EVALS: usize = 4;

/// One ranked candidate in a batch analysis.
#[derive(Debug, Serialize)]
pub struct CandidateReport {
    pub resume_id: Uuid,
    pub filename: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(flatten)]
    pub record: EvaluationRecord,
    #[serde(skip_serializing_if = "ReasoningMap::is_empty")]
    pub reasoning: ReasoningMap,
}

/// Evaluates every resume against the job description and returns reports
/// sorted by final score descending.
///
/// Enrichment failures never drop a report; the only propagated error is an
/// invalid `semantic_weight`, which is caller input and fails the whole
/// request before any per-resume work matters.
pub async fn analyze_batch(
    jd_text: String,
    jd_skills: SkillSet,
    resumes: Vec<ResumeDoc>,
    semantic_weight: f64,
    embedder: Option<Arc<dyn Embedder>>,
    reasoner: Option<LlmClient>,
    with_reasoning: bool,
) -> Result<Vec<CandidateReport>, AppError> {
    let jd_text = Arc::new(jd_text);
    let jd_skills = Arc::new(jd_skills);
    let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_EVALS));
    let total = resumes.len();

    let mut tasks: JoinSet<Result<CandidateReport, AppError>> = JoinSet::new();
    for resume in resumes {
        let jd_text = jd_text.clone();
        let jd_skills = jd_skills.clone();
        let embedder = embedder.clone();
        let reasoner = reasoner.clone();
        let semaphore = semaphore.clone();

        tasks.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|e| AppError::Internal(anyhow::anyhow!("semaphore closed: {e}")))?;

            let record = evaluate(
                &jd_text,
                &jd_skills,
                &resume.raw_text,
                &resume.skills,
                semantic_weight,
                embedder.as_deref(),
            )
            .await?;

            let reasoning = match (&reasoner, with_reasoning) {
                (Some(llm), true) if !record.missing.is_empty() => {
                    explain_gaps(llm, &record.matched, &record.missing).await
                }
                _ => ReasoningMap::new(),
            };

            Ok(CandidateReport {
                resume_id: resume.id,
                filename: resume.filename,
                name: resume.name,
                email: resume.email,
                phone: resume.phone,
                record,
                reasoning,
            })
        });
    }

    let mut reports = Vec::with_capacity(total);
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(report)) => reports.push(report),
            Ok(Err(e)) => return Err(e),
            Err(e) => {
                // A panicked evaluation loses one resume, not the batch.
                warn!("evaluation task failed to join: {e}");
            }
        }
    }

    reports.sort_by(|a, b| {
        b.record
            .final_score
            .partial_cmp(&a.record.final_score)
            .unwrap_or(Ordering::Equal)
    });

    info!(candidates = reports.len(), total, "batch analysis complete");
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::testing::StubEmbedder;
    use crate::matching::vocabulary::SkillLabel;
    use chrono::Utc;

    fn doc(filename: &str, text: &str, skills: &[&str]) -> ResumeDoc {
        ResumeDoc {
            id: Uuid::new_v4(),
            filename: filename.to_string(),
            name: None,
            email: None,
            phone: None,
            skills: SkillSet::from_labels(skills.iter().map(|&s| SkillLabel::new(s))),
            raw_text: text.to_string(),
            uploaded_at: Utc::now(),
        }
    }

    fn jd_skills(labels: &[&str]) -> SkillSet {
        SkillSet::from_labels(labels.iter().map(|&l| SkillLabel::new(l)))
    }

    #[tokio::test]
    async fn test_batch_ranks_by_final_score_descending() {
        let jd = "Python developer with SQL experience";
        let resumes = vec![
            doc("weak.pdf", "marketing and sales background", &[]),
            doc("strong.pdf", "Python developer with SQL experience", &["python", "sql"]),
            doc("mid.pdf", "Python scripting for data work", &["python"]),
        ];

        let reports = analyze_batch(
            jd.to_string(),
            jd_skills(&["python", "sql"]),
            resumes,
            0.85,
            Some(Arc::new(StubEmbedder::new())),
            None,
            false,
        )
        .await
        .unwrap();

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].filename, "strong.pdf");
        assert_eq!(reports[0].record.final_score, 100.0);
        for pair in reports.windows(2) {
            assert!(pair[0].record.final_score >= pair[1].record.final_score);
        }
    }

    #[tokio::test]
    async fn test_batch_propagates_invalid_weight() {
        let result = analyze_batch(
            "jd".to_string(),
            jd_skills(&[]),
            vec![doc("a.pdf", "text", &[])],
            1.5,
            None,
            None,
            false,
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_batch_without_embedder_still_scores_everyone() {
        let reports = analyze_batch(
            "python backend role".to_string(),
            jd_skills(&["python"]),
            vec![
                doc("a.pdf", "python backend services", &["python"]),
                doc("b.pdf", "unrelated profile", &[]),
            ],
            0.85,
            None,
            None,
            false,
        )
        .await
        .unwrap();

        assert_eq!(reports.len(), 2);
        for report in &reports {
            assert!(report.record.final_score >= 0.0 && report.record.final_score <= 100.0);
            assert!(!report.record.degraded.is_empty());
        }
    }

    #[tokio::test]
    async fn test_batch_empty_resume_list_is_empty_ranking() {
        let reports = analyze_batch(
            "jd".to_string(),
            jd_skills(&["python"]),
            vec![],
            0.5,
            None,
            None,
            false,
        )
        .await
        .unwrap();
        assert!(reports.is_empty());
    }
}

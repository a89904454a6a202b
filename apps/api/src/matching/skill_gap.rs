//! Skill gap resolver — partitions JD-required skills into matched and
//! missing relative to one resume's skill set.
//!
//! Direct matching compares normalized forms. Semantic tolerance reclassifies
//! a missing JD skill as matched when its label embedding is close enough to
//! any resume skill label, letting "PyTorch" satisfy "deep learning
//! frameworks" without a literal string match.
//!
//! Output sets are sorted case-insensitively by canonical label. This is
//! deliberately different from the extractor, which keeps detection order.

use serde::Serialize;
use tracing::debug;

use crate::embedding::{note_unavailable, Embedder};
use crate::matching::similarity::cosine;
use crate::matching::vocabulary::SkillSet;

/// Minimum label-to-label embedding similarity for a tolerant match.
pub const SEMANTIC_MATCH_THRESHOLD: f64 = 0.70;

/// Partition of the JD's required skills. Every JD skill appears in exactly
/// one of the two sets.
#[derive(Debug, Clone, Serialize)]
pub struct SkillGapResult {
    pub matched: SkillSet,
    pub missing: SkillSet,
}

/// Direct (normalized string) partition, output sorted for presentation.
pub fn resolve(resume_skills: &SkillSet, jd_skills: &SkillSet) -> SkillGapResult {
    let mut matched = SkillSet::new();
    let mut missing = SkillSet::new();

    for skill in jd_skills {
        if resume_skills.contains(skill) {
            matched.insert(skill.clone());
        } else {
            missing.insert(skill.clone());
        }
    }

    SkillGapResult {
        matched: matched.sorted_by_label(),
        missing: missing.sorted_by_label(),
    }
}

/// Partition with semantic tolerance. Falls back to the direct partition when
/// the embedding capability fails; degradation never loses JD skills.
pub async fn resolve_semantic(
    resume_skills: &SkillSet,
    jd_skills: &SkillSet,
    embedder: &dyn Embedder,
) -> SkillGapResult {
    let direct = resolve(resume_skills, jd_skills);
    if direct.missing.is_empty() || resume_skills.is_empty() {
        return direct;
    }

    let resume_labels: Vec<&str> = resume_skills.iter().map(|l| l.as_str()).collect();
    let resume_vectors = match embedder.embed_batch(&resume_labels).await {
        Ok(v) => v,
        Err(e) => {
            note_unavailable(&e);
            return direct;
        }
    };

    let mut matched = direct.matched;
    let mut missing = SkillSet::new();

    for skill in &direct.missing {
        let skill_vector = match embedder.embed(skill.as_str()).await {
            Ok(v) => v,
            Err(e) => {
                note_unavailable(&e);
                missing.insert(skill.clone());
                continue;
            }
        };

        let best = resume_vectors
            .iter()
            .map(|v| cosine(&skill_vector, v))
            .fold(0.0f64, f64::max);

        if best >= SEMANTIC_MATCH_THRESHOLD {
            debug!(skill = skill.as_str(), similarity = best, "semantic-tolerant match");
            matched.insert(skill.clone());
        } else {
            missing.insert(skill.clone());
        }
    }

    SkillGapResult {
        matched: matched.sorted_by_label(),
        missing: missing.sorted_by_label(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::testing::StubEmbedder;
    use crate::matching::vocabulary::SkillLabel;

    fn skills(labels: &[&str]) -> SkillSet {
        SkillSet::from_labels(labels.iter().map(|&l| SkillLabel::new(l)))
    }

    fn names(set: &SkillSet) -> Vec<&str> {
        set.iter().map(|l| l.as_str()).collect()
    }

    #[test]
    fn test_direct_partition_example() {
        let result = resolve(&skills(&["python"]), &skills(&["python", "sql"]));
        assert_eq!(names(&result.matched), vec!["python"]);
        assert_eq!(names(&result.missing), vec!["sql"]);
    }

    #[test]
    fn test_direct_match_ignores_case() {
        let result = resolve(&skills(&["Python"]), &skills(&["python"]));
        assert_eq!(result.matched.len(), 1);
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_partition_invariant_holds() {
        let jd = skills(&["python", "sql", "docker", "kubernetes"]);
        let result = resolve(&skills(&["docker", "python"]), &jd);

        assert_eq!(result.matched.len() + result.missing.len(), jd.len());
        for skill in &jd {
            let in_matched = result.matched.contains(skill);
            let in_missing = result.missing.contains(skill);
            assert!(in_matched ^ in_missing, "{skill} must appear exactly once");
        }
    }

    #[test]
    fn test_empty_resume_skills_all_missing() {
        let jd = skills(&["python", "sql"]);
        let result = resolve(&SkillSet::new(), &jd);
        assert!(result.matched.is_empty());
        assert_eq!(result.missing.len(), 2);
    }

    #[test]
    fn test_output_sorted_case_insensitively_not_by_jd_order() {
        let jd = skills(&["sql", "AWS", "python"]);
        let result = resolve(&SkillSet::new(), &jd);
        assert_eq!(names(&result.missing), vec!["AWS", "python", "sql"]);
    }

    #[tokio::test]
    async fn test_semantic_tolerance_reclassifies_close_skill() {
        let stub = StubEmbedder::new()
            .with_vector("deep learning frameworks", vec![1.0, 0.1])
            .with_vector("pytorch", vec![1.0, 0.0]);

        let result = resolve_semantic(
            &skills(&["pytorch"]),
            &skills(&["deep learning frameworks"]),
            &stub,
        )
        .await;

        assert_eq!(names(&result.matched), vec!["deep learning frameworks"]);
        assert!(result.missing.is_empty());
    }

    #[tokio::test]
    async fn test_semantic_tolerance_keeps_distant_skill_missing() {
        let stub = StubEmbedder::new()
            .with_vector("cobol", vec![0.0, 1.0])
            .with_vector("pytorch", vec![1.0, 0.0]);

        let result = resolve_semantic(&skills(&["pytorch"]), &skills(&["cobol"]), &stub).await;
        assert_eq!(names(&result.missing), vec!["cobol"]);
    }

    #[tokio::test]
    async fn test_semantic_failure_falls_back_to_direct_partition() {
        let stub = StubEmbedder::failing();
        let jd = skills(&["python", "sql"]);
        let result = resolve_semantic(&skills(&["python"]), &jd, &stub).await;

        assert_eq!(names(&result.matched), vec!["python"]);
        assert_eq!(names(&result.missing), vec!["sql"]);
    }

    #[tokio::test]
    async fn test_semantic_partition_invariant_holds() {
        let stub = StubEmbedder::new();
        let jd = skills(&["python", "docker", "terraform"]);
        let result = resolve_semantic(&skills(&["python", "aws"]), &jd, &stub).await;

        assert_eq!(result.matched.len() + result.missing.len(), jd.len());
        for skill in &jd {
            assert!(result.matched.contains(skill) ^ result.missing.contains(skill));
        }
    }
}

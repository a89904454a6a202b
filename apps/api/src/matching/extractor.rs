//! Skill extractor — detects vocabulary skills in a text.
//!
//! Keyword pass: normalized substring scan in vocabulary order.
//! Semantic pass (optional): labels whose embedding is close enough to the
//! whole-text embedding. Semantic hits take ordering priority in the union,
//! but the keyword pass is always the authoritative fallback — embedding
//! failure never aborts extraction.

use tracing::debug;

use crate::embedding::{note_unavailable, Embedder};
use crate::matching::similarity::cosine;
use crate::matching::vocabulary::{normalize, SkillLabel, SkillSet, SkillVocabulary};

/// Minimum label-to-text embedding similarity for a semantic detection.
pub const SEMANTIC_EXTRACT_THRESHOLD: f64 = 0.68;

/// Substring keyword detection, preserving vocabulary order.
pub fn extract_keyword(text: &str, vocabulary: &SkillVocabulary) -> SkillSet {
    let text_norm = normalize(text);
    if text_norm.is_empty() {
        return SkillSet::new();
    }
    SkillSet::from_labels(
        vocabulary
            .labels()
            .iter()
            .filter(|label| text_norm.contains(&label.normalized()))
            .cloned(),
    )
}

/// Embedding-similarity detection against the whole text. Returns labels in
/// vocabulary order. Any embedding failure yields an empty contribution.
async fn extract_semantic(
    text: &str,
    vocabulary: &SkillVocabulary,
    embedder: &dyn Embedder,
) -> Vec<SkillLabel> {
    if text.trim().is_empty() || vocabulary.is_empty() {
        return vec![];
    }

    let text_vector = match embedder.embed(text).await {
        Ok(v) => v,
        Err(e) => {
            note_unavailable(&e);
            return vec![];
        }
    };

    let label_strs: Vec<&str> = vocabulary.labels().iter().map(|l| l.as_str()).collect();
    let label_vectors = match embedder.embed_batch(&label_strs).await {
        Ok(v) => v,
        Err(e) => {
            note_unavailable(&e);
            return vec![];
        }
    };

    vocabulary
        .labels()
        .iter()
        .zip(&label_vectors)
        .filter(|(_, vector)| cosine(&text_vector, vector) >= SEMANTIC_EXTRACT_THRESHOLD)
        .map(|(label, _)| label.clone())
        .collect()
}

/// Full extraction: keyword pass plus optional semantic pass.
///
/// Union policy: semantic hits are prepended to keyword hits before
/// deduplication, so a skill detected both ways keeps its semantic ordering
/// position. Pass `None` to disable the semantic pass entirely.
pub async fn extract(
    text: &str,
    vocabulary: &SkillVocabulary,
    embedder: Option<&dyn Embedder>,
) -> SkillSet {
    let keyword_hits = extract_keyword(text, vocabulary);

    let semantic_hits = match embedder {
        Some(embedder) => extract_semantic(text, vocabulary, embedder).await,
        None => vec![],
    };

    if !semantic_hits.is_empty() {
        debug!(
            semantic = semantic_hits.len(),
            keyword = keyword_hits.len(),
            "semantic pass contributed skill detections"
        );
    }

    SkillSet::from_labels(semantic_hits.into_iter().chain(keyword_hits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::testing::StubEmbedder;

    fn vocab(labels: &[&str]) -> SkillVocabulary {
        SkillVocabulary::from_labels(labels.iter().copied())
    }

    #[test]
    fn test_keyword_hits_preserve_vocabulary_order() {
        let vocabulary = vocab(&["python", "sql", "docker", "aws"]);
        let text = "Built AWS pipelines in Python backed by SQL.";
        let skills = extract_keyword(text, &vocabulary);
        let found: Vec<&str> = skills.iter().map(|l| l.as_str()).collect();
        assert_eq!(found, vec!["python", "sql", "aws"]);
    }

    #[test]
    fn test_keyword_match_is_case_insensitive_substring() {
        let vocabulary = vocab(&["machine learning"]);
        let skills = extract_keyword("Expert in Machine Learning systems", &vocabulary);
        assert_eq!(skills.len(), 1);
    }

    #[test]
    fn test_keyword_empty_text_yields_empty_set() {
        let vocabulary = vocab(&["python"]);
        assert!(extract_keyword("", &vocabulary).is_empty());
        assert!(extract_keyword("   ", &vocabulary).is_empty());
    }

    #[tokio::test]
    async fn test_semantic_hits_win_ordering_priority() {
        // "pytorch" is detected semantically only; "python" and "sql" by
        // keyword. Semantic hits come first in the union.
        let text = "Shipped Python services with SQL and neural model training";
        let stub = StubEmbedder::new()
            .with_vector(text, vec![1.0, 0.0])
            .with_vector("pytorch", vec![1.0, 0.1])
            .with_vector("python", vec![0.0, 1.0])
            .with_vector("sql", vec![0.0, 1.0]);
        let vocabulary = vocab(&["python", "sql", "pytorch"]);

        let skills = extract(text, &vocabulary, Some(&stub)).await;
        let found: Vec<&str> = skills.iter().map(|l| l.as_str()).collect();
        assert_eq!(found, vec!["pytorch", "python", "sql"]);
    }

    #[tokio::test]
    async fn test_skill_detected_both_ways_appears_once() {
        let text = "python everywhere";
        let stub = StubEmbedder::new()
            .with_vector(text, vec![1.0, 0.0])
            .with_vector("python", vec![1.0, 0.0]);
        let vocabulary = vocab(&["python"]);

        let skills = extract(text, &vocabulary, Some(&stub)).await;
        assert_eq!(skills.len(), 1);
    }

    #[tokio::test]
    async fn test_embedding_failure_degrades_to_keyword_only() {
        let stub = StubEmbedder::failing();
        let vocabulary = vocab(&["python", "sql"]);

        let skills = extract("Python and SQL daily", &vocabulary, Some(&stub)).await;
        let found: Vec<&str> = skills.iter().map(|l| l.as_str()).collect();
        assert_eq!(found, vec!["python", "sql"]);
    }

    #[tokio::test]
    async fn test_disabled_semantic_matches_keyword_only_reference() {
        let vocabulary = vocab(&["python", "sql", "docker"]);
        let text = "Python scripting and docker builds";

        let disabled = extract(text, &vocabulary, None).await;
        let reference = extract_keyword(text, &vocabulary);
        assert_eq!(disabled, reference);
    }

    #[tokio::test]
    async fn test_below_threshold_labels_are_excluded() {
        let text = "generalist profile";
        let stub = StubEmbedder::new()
            .with_vector(text, vec![1.0, 0.0])
            .with_vector("kubernetes", vec![0.5, 0.9]);
        let vocabulary = vocab(&["kubernetes"]);

        let skills = extract(text, &vocabulary, Some(&stub)).await;
        assert!(skills.is_empty());
    }
}

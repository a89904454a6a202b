//! Similarity engine — lexical (TF-IDF cosine) and semantic (embedding
//! cosine) scores between a job description and a resume text.
//!
//! Lexical similarity is computed over the two-document corpus only. With two
//! documents, IDF degenerates to a boost for terms not shared by both; that
//! is accepted behavior and must stay stable for reproducibility. The score
//! is corpus-pair-relative, not globally calibrated. Cosine itself is
//! symmetric, so both metrics are argument-order-independent.

use std::collections::BTreeMap;

use crate::embedding::{EmbedError, Embedder};

/// Common English stopwords excluded from the lexical vector space.
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "because", "been", "before", "being", "below", "between", "both", "but", "by", "can", "could",
    "did", "do", "does", "down", "during", "each", "few", "for", "from", "further", "had", "has",
    "have", "he", "her", "here", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "more", "most", "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or",
    "other", "our", "out", "over", "own", "same", "she", "should", "so", "some", "such", "than",
    "that", "the", "their", "them", "then", "there", "these", "they", "this", "those", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which", "while",
    "who", "whom", "why", "will", "with", "would", "you", "your",
];

/// Rounds to 4 decimal places — similarity scores are reported at this
/// precision everywhere.
pub fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Cosine similarity between two vectors, accumulated in f64.
/// Returns 0.0 for mismatched lengths or zero-norm vectors.
pub fn cosine(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        dot += x as f64 * y as f64;
        norm_a += x as f64 * x as f64;
        norm_b += y as f64 * y as f64;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.binary_search(&token).is_ok()
}

/// Lowercase alphanumeric tokens of length >= 2, stopwords removed.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2 && !is_stopword(t))
        .map(str::to_string)
        .collect()
}

fn term_counts(tokens: &[String]) -> BTreeMap<&str, f64> {
    let mut counts = BTreeMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0.0) += 1.0;
    }
    counts
}

/// TF-IDF cosine similarity between two texts, restricted to the two-document
/// corpus. Smoothed IDF (`ln((1+n)/(1+df)) + 1`) with L2-normalized vectors.
/// Deterministic, symmetric, rounded to 4 decimals. Identical texts score
/// 1.0; texts with disjoint vocabularies (or no tokens) score 0.0.
pub fn lexical_similarity(a: &str, b: &str) -> f64 {
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let counts_a = term_counts(&tokens_a);
    let counts_b = term_counts(&tokens_b);

    // Union vocabulary in deterministic (sorted) order.
    let mut terms: Vec<&str> = counts_a.keys().chain(counts_b.keys()).copied().collect();
    terms.sort_unstable();
    terms.dedup();

    let n_docs = 2.0f64;
    let mut vec_a = Vec::with_capacity(terms.len());
    let mut vec_b = Vec::with_capacity(terms.len());
    for term in &terms {
        let tf_a = counts_a.get(term).copied().unwrap_or(0.0);
        let tf_b = counts_b.get(term).copied().unwrap_or(0.0);
        let df = (tf_a > 0.0) as u8 + (tf_b > 0.0) as u8;
        let idf = ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0;
        vec_a.push((tf_a * idf) as f32);
        vec_b.push((tf_b * idf) as f32);
    }

    round4(cosine(&vec_a, &vec_b))
}

/// Embedding cosine similarity between two full texts, rounded to 4 decimals.
/// The formula permits negative values for adversarial inputs; they are
/// passed through unchanged. Empty text yields 0.0 without touching the
/// embedding capability.
pub async fn semantic_similarity(
    a: &str,
    b: &str,
    embedder: &dyn Embedder,
) -> Result<f64, EmbedError> {
    if a.trim().is_empty() || b.trim().is_empty() {
        return Ok(0.0);
    }
    let vectors = embedder.embed_batch(&[a, b]).await?;
    Ok(round4(cosine(&vectors[0], &vectors[1])))
}

//! Skill vocabulary — canonical skill labels and order-stable skill sets.
//!
//! Labels have case-insensitive identity: two labels are the same skill iff
//! their normalized forms (`trim` + lowercase) are equal. Normalization is
//! used for comparison only; display always uses the canonical spelling.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Lowercased, trimmed comparison form of a skill string.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// A canonical skill label. Equality is on the normalized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillLabel(String);

impl SkillLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn normalized(&self) -> String {
        normalize(&self.0)
    }
}

impl PartialEq for SkillLabel {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for SkillLabel {}

impl fmt::Display for SkillLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SkillLabel {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Deduplicated, order-stable collection of skill labels.
///
/// Insertion keeps the first-seen canonical spelling; later inserts of the
/// same normalized form are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<SkillLabel>", into = "Vec<SkillLabel>")]
pub struct SkillSet {
    labels: Vec<SkillLabel>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from labels, deduplicating by normalized form and
    /// preserving first-seen order.
    pub fn from_labels<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = SkillLabel>,
    {
        let mut set = Self::new();
        for label in labels {
            set.insert(label);
        }
        set
    }

    /// Inserts a label unless an equivalent one is already present.
    /// Returns whether the label was added.
    pub fn insert(&mut self, label: SkillLabel) -> bool {
        if self.contains_normalized(&label.normalized()) {
            return false;
        }
        self.labels.push(label);
        true
    }

    pub fn contains(&self, label: &SkillLabel) -> bool {
        self.contains_normalized(&label.normalized())
    }

    pub fn contains_normalized(&self, normalized: &str) -> bool {
        self.labels.iter().any(|l| l.normalized() == normalized)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillLabel> {
        self.labels.iter()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns a copy sorted case-insensitively by canonical label.
    /// Used for presentation of gap-resolution output; extraction output
    /// keeps vocabulary/detection order instead.
    pub fn sorted_by_label(&self) -> SkillSet {
        let mut labels = self.labels.clone();
        labels.sort_by_key(|l| l.normalized());
        SkillSet { labels }
    }
}

impl From<Vec<SkillLabel>> for SkillSet {
    fn from(labels: Vec<SkillLabel>) -> Self {
        Self::from_labels(labels)
    }
}

impl From<SkillSet> for Vec<SkillLabel> {
    fn from(set: SkillSet) -> Self {
        set.labels
    }
}

impl IntoIterator for SkillSet {
    type Item = SkillLabel;
    type IntoIter = std::vec::IntoIter<SkillLabel>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.into_iter()
    }
}

impl<'a> IntoIterator for &'a SkillSet {
    type Item = &'a SkillLabel;
    type IntoIter = std::slice::Iter<'a, SkillLabel>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}

/// Master list used when no external vocabulary file is configured.
const DEFAULT_SKILLS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "typescript",
    "c++",
    "c",
    "c#",
    "html",
    "css",
    "react",
    "node",
    "express",
    "angular",
    "flask",
    "django",
    "fastapi",
    "machine learning",
    "deep learning",
    "nlp",
    "data science",
    "computer vision",
    "data analysis",
    "statistics",
    "sql",
    "tensorflow",
    "pytorch",
    "keras",
    "scikit-learn",
    "docker",
    "kubernetes",
    "aws",
    "azure",
    "gcp",
    "git",
    "github",
    "devops",
    "communication",
    "leadership",
];

/// Fixed, ordered sequence of canonical skill labels. Loaded once at startup
/// and shared read-only across all concurrent evaluations.
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    labels: Vec<SkillLabel>,
}

impl SkillVocabulary {
    /// Builds a vocabulary from raw labels, dropping blanks and duplicates
    /// while preserving order.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for raw in labels {
            let label = SkillLabel::new(raw);
            let norm = label.normalized();
            if norm.is_empty() || !seen.insert(norm) {
                continue;
            }
            out.push(label);
        }
        Self { labels: out }
    }

    /// Loads a vocabulary from a JSON array of strings.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading skill vocabulary from {}", path.display()))?;
        let labels: Vec<String> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing skill vocabulary JSON in {}", path.display()))?;
        Ok(Self::from_labels(labels))
    }

    pub fn labels(&self) -> &[SkillLabel] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::from_labels(DEFAULT_SKILLS.iter().copied())
    }
}

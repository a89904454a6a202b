//! Resume parsing — PDF text extraction plus contact and skill detection.

use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::embedding::Embedder;
use crate::errors::AppError;
use crate::ingest::contact;
use crate::matching::extractor;
use crate::matching::vocabulary::{SkillSet, SkillVocabulary};

/// Structured fields extracted from one resume document.
#[derive(Debug, Clone)]
pub struct ParsedResume {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: SkillSet,
    pub raw_text: String,
}

/// Extracts plain text from a PDF on disk. Extraction is CPU-bound, so it
/// runs on the blocking pool.
pub async fn extract_text_from_pdf(path: &Path) -> Result<String, AppError> {
    let path = path.to_path_buf();
    let text = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text(&path)
            .with_context(|| format!("extracting text from {}", path.display()))
    })
    .await
    .context("PDF extraction task panicked")??;
    Ok(text)
}

/// Full resume parse: text, contact details, and skill extraction (keyword
/// plus semantic when an embedder is supplied).
pub async fn parse_resume(
    path: &Path,
    vocabulary: &SkillVocabulary,
    embedder: Option<&dyn Embedder>,
) -> Result<ParsedResume, AppError> {
    let raw_text = extract_text_from_pdf(path).await?;
    if raw_text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "no extractable text in uploaded PDF".to_string(),
        ));
    }

    let skills = extractor::extract(&raw_text, vocabulary, embedder).await;
    debug!(skills = skills.len(), chars = raw_text.len(), "parsed resume");

    Ok(ParsedResume {
        name: contact::extract_name(&raw_text),
        email: contact::extract_email(&raw_text),
        phone: contact::extract_phone(&raw_text),
        skills,
        raw_text,
    })
}

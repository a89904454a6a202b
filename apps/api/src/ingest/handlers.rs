//! Axum route handlers for resume upload and listing.

use std::io::Write;

use axum::extract::{Multipart, Path, State};
use axum::Json;
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::parser::parse_resume;
use crate::ingest::store::ResumeDoc;
use crate::matching::vocabulary::SkillSet;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: Uuid,
    pub filename: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: SkillSet,
}

#[derive(Debug, Serialize)]
pub struct ListResumesResponse {
    pub count: usize,
    pub resumes: Vec<ResumeDoc>,
}

/// POST /api/v1/resumes — multipart upload of one resume PDF (field "file").
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let (filename, payload) = read_file_field(&mut multipart).await?;

    // pdf-extract reads from a path, so spool the upload to a tempfile.
    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("creating tempfile: {e}")))?;
    tmp.write_all(&payload)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spooling upload: {e}")))?;

    let parsed = parse_resume(
        tmp.path(),
        &state.vocabulary,
        state.embedder.as_deref(),
    )
    .await?;

    let doc = state.resumes.insert(filename, parsed).await;
    info!(
        id = %doc.id,
        filename = %doc.filename,
        skills = doc.skills.len(),
        "resume ingested"
    );

    Ok(Json(UploadResponse {
        id: doc.id,
        filename: doc.filename,
        name: doc.name,
        email: doc.email,
        phone: doc.phone,
        skills: doc.skills,
    }))
}

/// GET /api/v1/resumes
pub async fn handle_list(State(state): State<AppState>) -> Json<ListResumesResponse> {
    let resumes = state.resumes.list().await;
    Json(ListResumesResponse {
        count: resumes.len(),
        resumes,
    })
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeDoc>, AppError> {
    state
        .resumes
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("resume {id} not found")))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .unwrap_or("resume.pdf")
            .to_string();
        let payload = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("reading upload payload: {e}")))?;
        if payload.is_empty() {
            return Err(AppError::Validation("uploaded file is empty".to_string()));
        }
        return Ok((filename, payload));
    }
    Err(AppError::Validation(
        "multipart field 'file' is required".to_string(),
    ))
}

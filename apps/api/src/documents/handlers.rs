//! Axum route handlers for the Documents and Resumes APIs.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde_json::Value;

use crate::documents::converter::{convert_document, ConvertedDocument};
use crate::documents::summarizer::{summarize_resume, ResumeSummary};
use crate::documents::upload::{ensure_resume, DocumentKind, UploadForm};
use crate::errors::AppError;
use crate::state::AppState;
use crate::upstream::{ResumeMarkdown, UpstreamScore};

/// POST /api/v1/documents/convert
///
/// Multipart `file` (PDF, DOCX, or TXT) → Markdown.
pub async fn handle_convert(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ConvertedDocument>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.require_file()?;
    if file.kind == DocumentKind::Other {
        return Err(AppError::UnsupportedMediaType(
            "Please upload a PDF, DOCX, or TXT file.".to_string(),
        ));
    }

    let document = convert_document(
        file.file_name,
        file.kind,
        file.data,
        state.config.max_extracted_bytes,
    )
    .await?;
    Ok(Json(document))
}

/// POST /api/v1/resumes/summarize
pub async fn handle_summarize(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ResumeSummary>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.require_file()?;
    ensure_resume(&file)?;

    let document = convert_document(
        file.file_name,
        file.kind,
        file.data,
        state.config.max_extracted_bytes,
    )
    .await?;
    let summary = summarize_resume(&document, &state.llm).await?;
    Ok(Json(summary))
}

/// POST /api/v1/resumes/parse
///
/// Forwards to the upstream structured-parse endpoint; the JSON is returned unchanged.
pub async fn handle_upstream_parse(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.require_file()?;
    ensure_resume(&file)?;

    Ok(Json(state.upstream.parse_resume_json(&file).await?))
}

/// POST /api/v1/resumes/markdown
pub async fn handle_upstream_markdown(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ResumeMarkdown>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.require_file()?;
    ensure_resume(&file)?;

    Ok(Json(state.upstream.resume_markdown(&file).await?))
}

/// POST /api/v1/resumes/score
///
/// Multipart `file` + `job_description`, scored by the upstream service.
pub async fn handle_upstream_score(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UpstreamScore>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.require_file()?;
    let job_description = form.require_job_description()?;
    ensure_resume(&file)?;

    Ok(Json(
        state
            .upstream
            .score_resume(&file, &job_description)
            .await?,
    ))
}

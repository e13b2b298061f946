//! Axum route handlers for the Matching API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::documents::upload::UploadForm;
use crate::errors::AppError;
use crate::matching::jd_analyzer::{analyze_job_description, JobAnalysis};
use crate::matching::keyword::{MatchResult, SkillCoverage};
use crate::matching::pipeline::{match_resume_to_job, MatchReport};
use crate::matching::scorer::ScoredMatch;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub match_result: MatchResult,
    pub coverage: SkillCoverage,
    pub scorer_backend: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeJdRequest {
    pub job_description: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match/score
///
/// Scores already-extracted resume text against a list of skills. Never fails on content.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let ScoredMatch {
        match_result,
        coverage,
    } = state
        .match_scorer
        .score(&request.resume_text, &request.required_skills)
        .await?;

    Ok(Json(ScoreResponse {
        match_result,
        coverage,
        scorer_backend: state.match_scorer.backend(),
    }))
}

/// POST /api/v1/match
///
/// Multipart `file` (PDF/DOCX resume) + `job_description`. Runs the full pipeline.
pub async fn handle_match(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<MatchReport>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let resume = form.require_file()?;
    let job_description = form.require_job_description()?;

    let report = match_resume_to_job(
        resume,
        &job_description,
        &state.llm,
        state.match_scorer.as_ref(),
        state.config.max_extracted_bytes,
    )
    .await?;

    Ok(Json(report))
}

/// POST /api/v1/jobs/analyze
pub async fn handle_analyze_jd(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeJdRequest>,
) -> Result<Json<JobAnalysis>, AppError> {
    let analysis = analyze_job_description(&request.job_description, &state.llm).await?;
    Ok(Json(analysis))
}

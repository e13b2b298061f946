//! JD Analyzer — extracts required skills, required experience, and a summary from a job description.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::prompts::json_system;
use crate::llm_client::LlmClient;
use crate::matching::prompts::{JD_ANALYZE_PROMPT_TEMPLATE, JD_ANALYZE_ROLE};

/// Structured output of JD analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobAnalysis {
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub required_experience: String,
    #[serde(default)]
    pub summary: String,
}

/// Builds the analysis prompt for `job_description`.
pub fn build_analyze_prompt(job_description: &str) -> String {
    JD_ANALYZE_PROMPT_TEMPLATE.replace("{job_description}", job_description.trim())
}

/// Analyzes a job description using the LLM.
pub async fn analyze_job_description(
    job_description: &str,
    llm: &LlmClient,
) -> Result<JobAnalysis, AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let prompt = build_analyze_prompt(job_description);
    let analysis = llm
        .call_json::<JobAnalysis>(&prompt, &json_system(JD_ANALYZE_ROLE))
        .await
        .map_err(|e| AppError::Llm(format!("Job description analysis failed: {e}")))?;

    // Blank entries stay: they count toward the scorer's denominator.
    debug!(
        "JD analysis extracted {} required skills",
        analysis.required_skills.len()
    );

    Ok(analysis)
}

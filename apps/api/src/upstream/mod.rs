//! Upstream Resume API client — forwards uploads to the remote parse / markdown / score service.
//!
//! Every call is a multipart POST with a `file` part; scoring adds a `job_description` text part.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::documents::upload::UploadedFile;
use crate::retry::{Attempt, RetryPolicy};

const PARSE_JSON_PATH: &str = "/resume/upload-and-parse-json";
const MARKDOWN_PATH: &str = "/resume/upload";
const SCORE_PATH: &str = "/resume/upload-and-score";
const RETRY_POLICY: RetryPolicy = RetryPolicy::new(3, Duration::from_millis(500));

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeMarkdown {
    pub markdown_content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScoreSummary {
    pub total_score: f64,
    pub experience: String,
    pub required_skills: String,
    pub education_and_certification: String,
    pub language_proficiency: String,
    #[serde(default)]
    pub reason_for_deduction: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpstreamScore {
    pub skills_score: f64,
    pub education_score: f64,
    pub total_score: f64,
    pub summary: ScoreSummary,
}

#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl UpstreamClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RETRY_POLICY,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Structured resume fields. The remote schema is not fixed, so the JSON is passed through.
    pub async fn parse_resume_json(
        &self,
        file: &UploadedFile,
    ) -> Result<serde_json::Value, UpstreamError> {
        self.post_multipart(
            PARSE_JSON_PATH,
            file,
            None,
            "Failed to parse resume on server",
        )
        .await
    }

    pub async fn resume_markdown(&self, file: &UploadedFile) -> Result<ResumeMarkdown, UpstreamError> {
        self.post_multipart(MARKDOWN_PATH, file, None, "Failed to parse resume on server")
            .await
    }

    pub async fn score_resume(
        &self,
        file: &UploadedFile,
        job_description: &str,
    ) -> Result<UpstreamScore, UpstreamError> {
        self.post_multipart(
            SCORE_PATH,
            file,
            Some(job_description),
            "Failed to calculate score on server",
        )
        .await
    }

    /// Transport failures and 5xx are retried; 4xx fails immediately.
    async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        file: &UploadedFile,
        job_description: Option<&str>,
        default_message: &str,
    ) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        let url = url.as_str();

        let parsed = self
            .retry
            .run("Upstream call", move || {
                self.post_once(url, file, job_description, default_message)
            })
            .await?;

        debug!("Upstream call to {} succeeded", path);
        Ok(parsed)
    }

    async fn post_once<T: DeserializeOwned>(
        &self,
        url: &str,
        file: &UploadedFile,
        job_description: Option<&str>,
        default_message: &str,
    ) -> Result<T, Attempt<UpstreamError>> {
        let form = build_form(file, job_description).map_err(Attempt::Fatal)?;
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Attempt::Retry(UpstreamError::Http(e)))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| Attempt::Fatal(UpstreamError::Http(e)));
        }

        let body = response.text().await.unwrap_or_default();
        let err = UpstreamError::Api {
            status: status.as_u16(),
            message: if body.trim().is_empty() {
                default_message.to_string()
            } else {
                body
            },
        };
        Err(if status.is_server_error() {
            Attempt::Retry(err)
        } else {
            Attempt::Fatal(err)
        })
    }
}

fn build_form(file: &UploadedFile, job_description: Option<&str>) -> Result<Form, UpstreamError> {
    let part = Part::bytes(file.data.to_vec())
        .file_name(file.file_name.clone())
        .mime_str(file.kind.mime())?;

    let form = Form::new().part("file", part);
    Ok(match job_description {
        Some(jd) => form.text("job_description", jd.to_string()),
        None => form,
    })
}

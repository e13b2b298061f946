//! Resume Summarizer — condenses a converted resume into a 2–3 sentence summary via the LLM.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::documents::converter::ConvertedDocument;
use crate::documents::prompts::{RESUME_SUMMARY_PROMPT_TEMPLATE, RESUME_SUMMARY_ROLE};
use crate::errors::AppError;
use crate::llm_client::prompts::json_system;
use crate::llm_client::LlmClient;

/// Returned instead of an LLM summary when the resume yielded no text.
pub const EMPTY_RESUME_SUMMARY: &str =
    "Could not extract text from the resume file or the file is empty.";

/// Resume text beyond this many characters is cut before prompting.
const MAX_PROMPT_CHARS: usize = 40_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSummary {
    pub summary: String,
}

impl ResumeSummary {
    /// True when the summary is the empty-resume sentinel rather than real content.
    pub fn is_empty_resume(&self) -> bool {
        self.summary.trim().is_empty() || self.summary == EMPTY_RESUME_SUMMARY
    }
}

pub fn build_summary_prompt(resume_markdown: &str) -> String {
    let text = match resume_markdown.char_indices().nth(MAX_PROMPT_CHARS) {
        Some((cut, _)) => &resume_markdown[..cut],
        None => resume_markdown,
    };
    RESUME_SUMMARY_PROMPT_TEMPLATE.replace("{resume_text}", text)
}

/// Summarizes a converted resume. Empty documents short-circuit without an LLM call.
pub async fn summarize_resume(
    document: &ConvertedDocument,
    llm: &LlmClient,
) -> Result<ResumeSummary, AppError> {
    if !document.has_content() {
        warn!("Converted document '{}' is empty", document.file_name);
        return Ok(ResumeSummary {
            summary: EMPTY_RESUME_SUMMARY.to_string(),
        });
    }

    let prompt = build_summary_prompt(&document.markdown);
    let summary: ResumeSummary = llm
        .call_json(&prompt, &json_system(RESUME_SUMMARY_ROLE))
        .await
        .map_err(|e| AppError::Llm(format!("Failed to generate resume summary: {e}")))?;

    info!("Resume '{}' summarized successfully", document.file_name);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::upload::DocumentKind;

    #[tokio::test]
    async fn test_empty_document_returns_sentinel_without_llm() {
        let document = ConvertedDocument {
            file_name: "blank.pdf".to_string(),
            kind: DocumentKind::Pdf,
            markdown: "# Converted Content: blank.pdf".to_string(),
            word_count: 0,
        };
        let llm = LlmClient::new("test-key".to_string()).unwrap();
        let summary = summarize_resume(&document, &llm).await.unwrap();
        assert_eq!(summary.summary, EMPTY_RESUME_SUMMARY);
        assert!(summary.is_empty_resume());
    }

    #[test]
    fn test_prompt_is_truncated() {
        let long = "a".repeat(MAX_PROMPT_CHARS + 500);
        let prompt = build_summary_prompt(&long);
        assert!(prompt.contains(&"a".repeat(MAX_PROMPT_CHARS)));
        assert!(!prompt.contains(&"a".repeat(MAX_PROMPT_CHARS + 1)));
    }

    #[test]
    fn test_real_summary_is_not_sentinel() {
        let summary = ResumeSummary {
            summary: "Backend engineer with Rust and SQL.".to_string(),
        };
        assert!(!summary.is_empty_resume());
    }

    #[test]
    fn test_summary_sharing_sentinel_prefix_is_real() {
        let summary = ResumeSummary {
            summary: "Could not extract text from legacy systems was never a problem for this \
                      data engineer with 8 years of ETL work."
                .to_string(),
        };
        assert!(!summary.is_empty_resume());
    }
}

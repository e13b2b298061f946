//! Resume ↔ job matching pipeline: summarize resume → analyze JD → keyword score.

use serde::Serialize;
use tracing::info;

use crate::documents::converter::convert_document;
use crate::documents::summarizer::{summarize_resume, ResumeSummary};
use crate::documents::upload::{ensure_resume, UploadedFile};
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::matching::jd_analyzer::{analyze_job_description, JobAnalysis};
use crate::matching::keyword::{MatchResult, SkillCoverage};
use crate::matching::scorer::{MatchScorer, ScoredMatch};

#[derive(Debug, Serialize)]
pub struct MatchReport {
    pub match_result: MatchResult,
    pub coverage: SkillCoverage,
    pub resume_summary: String,
    pub job_analysis: JobAnalysis,
    pub scorer_backend: &'static str,
}

/// Runs the full pipeline for an uploaded resume and a pasted job description.
/// `max_extracted_bytes` bounds the decompressed document text.
pub async fn match_resume_to_job(
    resume: UploadedFile,
    job_description: &str,
    llm: &LlmClient,
    scorer: &dyn MatchScorer,
    max_extracted_bytes: usize,
) -> Result<MatchReport, AppError> {
    ensure_resume(&resume)?;
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter the job description.".to_string(),
        ));
    }

    info!("Summarizing resume '{}'", resume.file_name);
    let document = convert_document(
        resume.file_name,
        resume.kind,
        resume.data,
        max_extracted_bytes,
    )
    .await?;
    let summary = summarize_resume(&document, llm).await?;
    ensure_usable_summary(&summary)?;

    info!("Analyzing job description ({} chars)", job_description.len());
    let job_analysis = analyze_job_description(job_description, llm).await?;

    score_summary(summary.summary, job_analysis, scorer).await
}

/// Final stage, split out so it can run without an LLM.
pub async fn score_summary(
    resume_summary: String,
    job_analysis: JobAnalysis,
    scorer: &dyn MatchScorer,
) -> Result<MatchReport, AppError> {
    let ScoredMatch {
        match_result,
        coverage,
    } = scorer
        .score(&resume_summary, &job_analysis.required_skills)
        .await?;

    info!(
        "Match calculated: score={} ({} of {} skills)",
        match_result.score,
        coverage.matched.len(),
        coverage.total
    );

    Ok(MatchReport {
        match_result,
        coverage,
        resume_summary,
        job_analysis,
        scorer_backend: scorer.backend(),
    })
}

fn ensure_usable_summary(summary: &ResumeSummary) -> Result<(), AppError> {
    if summary.is_empty_resume() {
        let message = if summary.summary.trim().is_empty() {
            "Failed to extract text from resume.".to_string()
        } else {
            summary.summary.clone()
        };
        return Err(AppError::UnprocessableEntity(message));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::summarizer::EMPTY_RESUME_SUMMARY;
    use crate::documents::upload::DocumentKind;
    use crate::matching::scorer::KeywordMatchScorer;
    use async_trait::async_trait;
    use bytes::Bytes;

    const EXTRACT_LIMIT: usize = 1024 * 1024;

    /// Reports a fixed breakdown regardless of input.
    struct FixedScorer;

    #[async_trait]
    impl MatchScorer for FixedScorer {
        async fn score(&self, _: &str, _: &[String]) -> Result<ScoredMatch, AppError> {
            Ok(ScoredMatch {
                match_result: MatchResult {
                    score: 90,
                    summary: "semantic".to_string(),
                },
                coverage: SkillCoverage {
                    matched: vec!["Go".to_string()],
                    missing: vec![],
                    total: 1,
                },
            })
        }

        fn backend(&self) -> &'static str {
            "fixed"
        }
    }

    fn llm() -> LlmClient {
        LlmClient::new("test-key".to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_score_summary_reports_coverage() {
        let analysis = JobAnalysis {
            required_skills: vec!["Python".into(), "SQL".into(), "Java".into()],
            required_experience: "2 years".into(),
            summary: "Data role".into(),
        };
        let report = score_summary(
            "I have strong python and sql skills".to_string(),
            analysis,
            &KeywordMatchScorer::default(),
        )
        .await
        .unwrap();

        assert_eq!(report.match_result.score, 67);
        assert_eq!(report.coverage.missing, vec!["Java".to_string()]);
        assert_eq!(report.scorer_backend, "keyword");
    }

    #[tokio::test]
    async fn test_blank_skills_stay_in_denominator() {
        let analysis = JobAnalysis {
            required_skills: vec!["Python".into(), "".into(), " ".into()],
            ..JobAnalysis::default()
        };
        let report = score_summary(
            "python dev".to_string(),
            analysis,
            &KeywordMatchScorer::default(),
        )
        .await
        .unwrap();

        assert_eq!(report.match_result.score, 33);
        assert_eq!(report.coverage.total, 3);
        assert_eq!(report.job_analysis.required_skills.len(), 3);
    }

    #[tokio::test]
    async fn test_report_uses_scorer_coverage() {
        let analysis = JobAnalysis {
            required_skills: vec!["Python".into()],
            ..JobAnalysis::default()
        };
        let report = score_summary("python dev".to_string(), analysis, &FixedScorer)
            .await
            .unwrap();

        assert_eq!(report.match_result.score, 90);
        assert_eq!(report.coverage.matched, vec!["Go".to_string()]);
        assert!(report.coverage.missing.is_empty());
        assert_eq!(report.scorer_backend, "fixed");
    }

    #[tokio::test]
    async fn test_text_resume_rejected() {
        let resume = UploadedFile {
            file_name: "cv.txt".to_string(),
            kind: DocumentKind::Txt,
            data: Bytes::from_static(b"python"),
        };
        let err = match_resume_to_job(
            resume,
            "Python dev",
            &llm(),
            &KeywordMatchScorer::default(),
            EXTRACT_LIMIT,
        )
        .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMediaType(_)));
    }

    #[tokio::test]
    async fn test_blank_job_description_rejected() {
        let resume = UploadedFile {
            file_name: "cv.pdf".to_string(),
            kind: DocumentKind::Pdf,
            data: Bytes::from_static(b"%PDF"),
        };
        let err = match_resume_to_job(
            resume,
            "  ",
            &llm(),
            &KeywordMatchScorer::default(),
            EXTRACT_LIMIT,
        )
        .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_sentinel_summary_is_unprocessable() {
        let summary = ResumeSummary {
            summary: EMPTY_RESUME_SUMMARY.to_string(),
        };
        match ensure_usable_summary(&summary) {
            Err(AppError::UnprocessableEntity(msg)) => assert_eq!(msg, EMPTY_RESUME_SUMMARY),
            other => panic!("unexpected: {other:?}"),
        }
    }
}

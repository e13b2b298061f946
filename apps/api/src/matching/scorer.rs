//! Match scoring seam — handlers only ever see `Arc<dyn MatchScorer>`.
//!
//! Default: `KeywordMatchScorer` (pure-Rust, deterministic, no LLM call).

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::AppError;
use crate::matching::keyword::{
    result_for_coverage, skill_coverage, MatchResult, SkillCoverage, NEUTRAL_FALLBACK_SCORE,
};

/// A score together with the per-phrase breakdown that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredMatch {
    pub match_result: MatchResult,
    pub coverage: SkillCoverage,
}

/// Implement this to swap scoring backends without touching the endpoint or pipeline code.
/// Backends report their own coverage so the breakdown always agrees with the score.
#[async_trait]
pub trait MatchScorer: Send + Sync {
    async fn score(
        &self,
        resume_text: &str,
        required_skills: &[String],
    ) -> Result<ScoredMatch, AppError>;

    /// Backend label surfaced in responses.
    fn backend(&self) -> &'static str;
}

/// Keyword set-containment scorer.
#[derive(Debug, Clone, Copy)]
pub struct KeywordMatchScorer {
    /// Score reported when there are no required skills.
    pub empty_skills_score: u8,
}

impl Default for KeywordMatchScorer {
    fn default() -> Self {
        Self {
            empty_skills_score: NEUTRAL_FALLBACK_SCORE,
        }
    }
}

#[async_trait]
impl MatchScorer for KeywordMatchScorer {
    async fn score(
        &self,
        resume_text: &str,
        required_skills: &[String],
    ) -> Result<ScoredMatch, AppError> {
        let coverage = skill_coverage(resume_text, required_skills);
        Ok(ScoredMatch {
            match_result: result_for_coverage(&coverage, self.empty_skills_score),
            coverage,
        })
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::keyword::compute_match;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_keyword_scorer_uses_configured_fallback() {
        let scorer: Arc<dyn MatchScorer> = Arc::new(KeywordMatchScorer {
            empty_skills_score: 0,
        });
        let scored = scorer.score("anything", &[]).await.unwrap();
        assert_eq!(scored.match_result.score, 0);
        assert_eq!(scored.coverage.total, 0);
        assert_eq!(scorer.backend(), "keyword");
    }

    #[tokio::test]
    async fn test_default_keyword_scorer_matches_pure_function() {
        let skills = vec!["Rust".to_string(), "Kafka".to_string(), " ".to_string()];
        let resume = "Rust services on Kafka";
        let scored = KeywordMatchScorer::default()
            .score(resume, &skills)
            .await
            .unwrap();
        assert_eq!(scored.match_result, compute_match(resume, &skills));
        assert_eq!(scored.match_result.score, 67);
        assert_eq!(scored.coverage.matched, vec!["Rust", "Kafka"]);
        assert_eq!(scored.coverage.total, 3);
    }
}

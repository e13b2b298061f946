//! Keyword match scoring — measures how many required skill phrases a resume summary covers.
//!
//! Pure, deterministic, no I/O. A phrase counts as matched only when every one of its
//! words appears in the resume's token set; there is no partial credit.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Score returned when the job description yielded no skills to compare against.
pub const NEUTRAL_FALLBACK_SCORE: u8 = 50;

const STRONG_THRESHOLD: u8 = 80;
const MODERATE_THRESHOLD: u8 = 50;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Alignment score plus a one-paragraph verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: u8, // 0 – 100
    pub summary: String,
}

/// Per-phrase breakdown behind a `MatchResult`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCoverage {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    /// Every input phrase, including blank ones that were skipped.
    pub total: usize,
}

/// Scores `resume_text` against `required_skills` using the neutral fallback for an empty list.
///
/// The service scores through [`crate::matching::scorer::MatchScorer`], which also needs the
/// coverage breakdown, so this convenience form is only exercised by tests.
#[cfg_attr(not(test), allow(dead_code))]
pub fn compute_match(resume_text: &str, required_skills: &[String]) -> MatchResult {
    result_for_coverage(
        &skill_coverage(resume_text, required_skills),
        NEUTRAL_FALLBACK_SCORE,
    )
}

/// Score and summary for an already computed coverage; `fallback_score` applies when
/// there were no phrases at all.
pub fn result_for_coverage(coverage: &SkillCoverage, fallback_score: u8) -> MatchResult {
    let score = coverage_score(coverage, fallback_score);
    MatchResult {
        score,
        summary: build_summary(score, coverage.matched.len(), coverage.total),
    }
}

/// Splits each phrase into words and checks them against the resume's token set.
pub fn skill_coverage(resume_text: &str, required_skills: &[String]) -> SkillCoverage {
    let tokens = tokenize(resume_text);
    let mut coverage = SkillCoverage {
        total: required_skills.len(),
        ..SkillCoverage::default()
    };

    for skill in required_skills {
        let skill_lower = skill.to_lowercase();
        let words: Vec<&str> = skill_lower.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        if words.iter().all(|w| tokens.contains(*w)) {
            coverage.matched.push(skill.clone());
        } else {
            coverage.missing.push(skill.clone());
        }
    }

    coverage
}

/// Lowercase word tokens of `text`. Anything outside `\w` separates tokens.
pub fn tokenize(text: &str) -> HashSet<String> {
    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn coverage_score(coverage: &SkillCoverage, fallback_score: u8) -> u8 {
    if coverage.total == 0 {
        return fallback_score.min(100);
    }
    let ratio = coverage.matched.len() as f64 / coverage.total as f64;
    (ratio * 100.0).round().min(100.0) as u8
}

fn build_summary(score: u8, matched: usize, total: usize) -> String {
    let mut summary = String::from("AI analysis complete. ");

    if total > 0 {
        summary.push_str(&format!(
            "The resume summary mentions approximately {matched} out of {total} key skills identified in the job description. "
        ));
    } else {
        summary.push_str(
            "Could not identify specific required skills in the job description to compare against. ",
        );
    }

    summary.push_str(if score >= STRONG_THRESHOLD {
        "This suggests a strong potential alignment."
    } else if score >= MODERATE_THRESHOLD {
        "This suggests a moderate potential alignment."
    } else {
        "There may be gaps in alignment based on the extracted skills."
    });

    summary
}

use anyhow::{bail, Context, Result};

use crate::matching::keyword::NEUTRAL_FALLBACK_SCORE;

const DEFAULT_UPSTREAM_API_URL: &str = "https://fastapi.dsbitteam.in";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_MAX_EXTRACTED_BYTES: usize = 32 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub upstream_api_url: String,
    pub upstream_timeout_secs: u64,
    pub max_upload_bytes: usize,
    /// Cap on text inflated out of an upload (DOCX XML, extracted PDF text).
    pub max_extracted_bytes: usize,
    /// Score reported when a job description yields no required skills.
    pub empty_skills_score: u8,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let empty_skills_score: u8 = parse_env("EMPTY_SKILLS_SCORE", NEUTRAL_FALLBACK_SCORE)?;
        if empty_skills_score > 100 {
            bail!("EMPTY_SKILLS_SCORE must be between 0 and 100, got {empty_skills_score}");
        }

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            upstream_api_url: std::env::var("UPSTREAM_API_URL")
                .unwrap_or_else(|_| DEFAULT_UPSTREAM_API_URL.to_string()),
            upstream_timeout_secs: parse_env("UPSTREAM_TIMEOUT_SECS", 120)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            max_extracted_bytes: parse_env("MAX_EXTRACTED_BYTES", DEFAULT_MAX_EXTRACTED_BYTES)?,
            empty_skills_score,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

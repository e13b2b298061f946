use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::matching::scorer::MatchScorer;
use crate::upstream::UpstreamClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub upstream: UpstreamClient,
    pub config: Config,
    /// Pluggable match scorer. Default: KeywordMatchScorer.
    pub match_scorer: Arc<dyn MatchScorer>,
}

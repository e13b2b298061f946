mod config;
mod documents;
mod errors;
mod llm_client;
mod matching;
mod retry;
mod routes;
mod state;
mod upstream;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::matching::scorer::KeywordMatchScorer;
use crate::routes::build_router;
use crate::state::AppState;
use crate::upstream::UpstreamClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career Docs API v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let upstream = UpstreamClient::new(
        &config.upstream_api_url,
        Duration::from_secs(config.upstream_timeout_secs),
    )?;
    info!("Upstream resume API: {}", upstream.base_url());

    let match_scorer = Arc::new(KeywordMatchScorer {
        empty_skills_score: config.empty_skills_score,
    });
    info!(
        "Match scorer: keyword (empty-skills score {})",
        config.empty_skills_score
    );

    let state = AppState {
        llm,
        upstream,
        config: config.clone(),
        match_scorer,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

mod config;
mod errors;
mod llm_client;
mod models;
mod outreach;
mod portfolio;
mod routes;
mod scraping;
mod search;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, GROQ_CONSOLE_URL};
use crate::llm_client::LlmClient;
use crate::outreach::workflow::Pipeline;
use crate::portfolio::KeywordPortfolio;
use crate::routes::build_router;
use crate::scraping::HttpScraper;
use crate::search::DuckDuckGoSearch;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Missing GROQ_API_KEY exits with a pointer to the Groq console
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            eprintln!("Get a Groq API key at {GROQ_CONSOLE_URL} and set GROQ_API_KEY.");
            std::process::exit(1);
        }
    };

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Outreach API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.groq_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let scraper = HttpScraper::new()?;
    let search = DuckDuckGoSearch::new()?;

    // An unreadable portfolio only costs the emails their links
    let portfolio = match KeywordPortfolio::load(&config.portfolio_path) {
        Ok(portfolio) if portfolio.is_empty() => {
            warn!("Portfolio file {} has no entries", config.portfolio_path);
            portfolio
        }
        Ok(portfolio) => {
            info!(
                "Loaded {} portfolio entries from {}",
                portfolio.len(),
                config.portfolio_path
            );
            portfolio
        }
        Err(e) => {
            warn!("Portfolio unavailable ({e}); emails will carry no links");
            KeywordPortfolio::new(Vec::new())
        }
    };

    let sessions = SessionStore::new(config.session_idle_timeout);
    spawn_session_sweeper(sessions.clone());

    // Build app state
    let state = AppState {
        sessions,
        pipeline: Pipeline {
            llm: Arc::new(llm),
            scraper: Arc::new(scraper),
            search: Arc::new(search),
            portfolio: Arc::new(portfolio),
        },
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Evicts idle sessions periodically so abandoned ones are freed even when
/// no new sessions arrive.
fn spawn_session_sweeper(sessions: SessionStore) {
    let period = sessions.idle_timeout().max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            sessions.evict_idle();
        }
    });
}

mod analyzer;
mod assessment;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod recommend;
mod records;
mod routes;
mod state;
mod steps;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analyzer::runner::ScriptRunner;
use crate::analyzer::{PythonAnalyzer, AUDIO_SCRIPT, RECOMMEND_SCRIPT, VIDEO_SCRIPT};
use crate::assessment::scoring::ScoringWeights;
use crate::auth::verification::VerificationCodes;
use crate::config::Config;
use crate::db::create_pool;
use crate::recommend::tmdb::TmdbClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Stress API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (and apply migrations)
    let db = create_pool(&config.database_url).await?;

    // Inference scripts
    let runner = ScriptRunner::new(
        config.python_bin.clone(),
        config.scripts_dir.clone(),
        config.script_timeout,
    );
    for script in [AUDIO_SCRIPT, VIDEO_SCRIPT, RECOMMEND_SCRIPT] {
        let path = runner.script_path(script);
        if !path.exists() {
            warn!("Inference script not found: {}", path.display());
        }
    }
    info!(
        "Script runner initialized ({} in {}, timeout {}s)",
        config.python_bin,
        config.scripts_dir.display(),
        config.script_timeout.as_secs()
    );

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    // TMDB client
    let tmdb = TmdbClient::new(config.tmdb_api_key.clone())?;
    info!("TMDB client initialized");

    let state = AppState {
        db,
        config: config.clone(),
        analyzer: Arc::new(PythonAnalyzer::new(runner)),
        movies: Arc::new(tmdb),
        verification_codes: VerificationCodes::new(),
        weights: ScoringWeights::default(),
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

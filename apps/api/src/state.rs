use std::sync::Arc;

use sqlx::PgPool;

use crate::analyzer::EmotionAnalyzer;
use crate::assessment::scoring::ScoringWeights;
use crate::auth::verification::VerificationCodes;
use crate::config::Config;
use crate::recommend::tmdb::MovieCatalog;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Emotion inference backend. Default: Python scripts under `SCRIPTS_DIR`.
    pub analyzer: Arc<dyn EmotionAnalyzer>,
    /// Movie source. Default: TMDB discover.
    pub movies: Arc<dyn MovieCatalog>,
    /// Pending password-reset codes, keyed by email.
    pub verification_codes: VerificationCodes,
    pub weights: ScoringWeights,
}

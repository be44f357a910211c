use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::recommend::tmdb::MovieDto;
use crate::state::AppState;

fn default_count() -> usize {
    2
}

#[derive(Debug, Deserialize)]
pub struct MoviesQuery {
    pub emotion: String,
    #[serde(default = "default_count")]
    pub count: usize,
}

/// GET /api/recommendations/movies?emotion=&count=
pub async fn handle_get_movies(
    State(state): State<AppState>,
    Query(params): Query<MoviesQuery>,
) -> Result<Json<Vec<MovieDto>>, AppError> {
    info!("Movie recommendations requested for emotion={}", params.emotion);
    let movies = state
        .movies
        .recommend_movies(&params.emotion, params.count)
        .await?;
    Ok(Json(movies))
}

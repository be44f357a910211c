use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::record::RecordRow;
use crate::records::repo;
use crate::state::AppState;

/// Client-facing shape of a record: `emotion_result` is exposed as `emotion`
/// and the originating score id is left out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    pub id: i64,
    pub final_score: Option<i32>,
    pub emotion: Option<String>,
    pub recommended_songs: Option<String>,
    pub recommended_movie: Option<String>,
    pub reason: Option<String>,
    pub solution: Option<String>,
    pub created_at: DateTime<Utc>,
    pub favorite: bool,
    pub movie_poster_url: Option<String>,
    pub movie_rating_percent: Option<i32>,
}

impl From<RecordRow> for RecordView {
    fn from(r: RecordRow) -> Self {
        Self {
            id: r.id,
            final_score: r.final_score,
            emotion: r.emotion_result,
            recommended_songs: r.recommended_songs,
            recommended_movie: r.recommended_movie,
            reason: r.reason,
            solution: r.solution,
            created_at: r.created_at,
            favorite: r.favorite,
            movie_poster_url: r.movie_poster_url,
            movie_rating_percent: r.movie_rating_percent,
        }
    }
}

fn to_views(rows: Vec<RecordRow>) -> Vec<RecordView> {
    rows.into_iter().map(RecordView::from).collect()
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct OptionalEmailQuery {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FavoriteToggle {
    #[serde(default)]
    pub favorite: bool,
}

/// GET /api/records?email=
pub async fn handle_list_records(
    State(state): State<AppState>,
    Query(params): Query<EmailQuery>,
) -> Result<Json<Vec<RecordView>>, AppError> {
    let rows = repo::find_by_email(&state.db, &params.email).await?;
    Ok(Json(to_views(rows)))
}

/// DELETE /api/records/:id
pub async fn handle_delete_record(
    State(state): State<AppState>,
    Path(record_id): Path<i64>,
) -> Result<&'static str, AppError> {
    if !repo::delete_record(&state.db, record_id).await? {
        return Err(AppError::NotFound(format!("Record {record_id} not found")));
    }
    Ok("삭제 완료")
}

/// PATCH /api/records/:id/favorite
pub async fn handle_update_favorite(
    State(state): State<AppState>,
    Path(record_id): Path<i64>,
    Json(req): Json<FavoriteToggle>,
) -> Result<Json<RecordRow>, AppError> {
    let record = repo::set_favorite(&state.db, record_id, req.favorite)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Record {record_id} not found")))?;
    Ok(Json(record))
}

/// GET /api/records/all
pub async fn handle_all_records(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecordRow>>, AppError> {
    Ok(Json(repo::find_all(&state.db).await?))
}

/// GET /api/records/favorites?email=
pub async fn handle_favorite_records(
    State(state): State<AppState>,
    Query(params): Query<OptionalEmailQuery>,
) -> Result<Json<Vec<RecordView>>, AppError> {
    let email = params.email.as_deref().filter(|e| !e.is_empty());
    let rows = repo::find_favorites(&state.db, email).await?;
    Ok(Json(to_views(rows)))
}

/// GET /api/records/latest?email=
pub async fn handle_latest_record(
    State(state): State<AppState>,
    Query(params): Query<EmailQuery>,
) -> Result<Json<RecordView>, AppError> {
    let record = repo::find_latest_by_email(&state.db, &params.email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No records for {}", params.email)))?;
    Ok(Json(record.into()))
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Historical result of a completed assessment, owned by an email.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecordRow {
    pub id: i64,
    pub email: String,
    pub emotion_result: Option<String>,
    pub recommended_songs: Option<String>,
    pub recommended_movie: Option<String>,
    pub reason: Option<String>,
    pub solution: Option<String>,
    pub created_at: DateTime<Utc>,
    pub favorite: bool,
    pub movie_poster_url: Option<String>,
    pub movie_rating_percent: Option<i32>,
    pub final_score: Option<i32>,
    pub score_id: Option<i64>,
}

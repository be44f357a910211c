use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One assessment session. Signals are filled in as uploads arrive; the
/// final score and recommendations once the session is completed.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub face_score: Option<f64>,
    pub voice_score: Option<f64>,
    pub question_score: Option<f64>,
    pub final_score: Option<i32>,
    pub recommended_songs: Option<String>,
    pub emotion: Option<String>,
    pub favorite: bool,
    pub solution: Option<String>,
    pub recommended_movie: Option<String>,
    pub movie_poster_url: Option<String>,
    pub movie_rating_percent: Option<i32>,
    pub created_at: DateTime<Utc>,
}

use sqlx::PgPool;

use crate::models::score::ScoreRow;

/// One of the three per-session signals a score row collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Face,
    Voice,
    Question,
}

impl Signal {
    fn column(&self) -> &'static str {
        match self {
            Signal::Face => "face_score",
            Signal::Voice => "voice_score",
            Signal::Question => "question_score",
        }
    }
}

/// Final outcome written back onto a score row. `None` movie fields leave
/// whatever is stored untouched.
#[derive(Debug, Clone)]
pub struct FinalResultUpdate<'a> {
    pub final_score: i32,
    pub emotion: &'a str,
    pub recommended_songs: &'a str,
    pub solution: &'a str,
    pub recommended_movie: Option<&'a str>,
    pub movie_poster_url: Option<&'a str>,
    pub movie_rating_percent: Option<i32>,
}

pub async fn create_score(pool: &PgPool, user_id: Option<i64>) -> Result<ScoreRow, sqlx::Error> {
    sqlx::query_as::<_, ScoreRow>("INSERT INTO scores (user_id) VALUES ($1) RETURNING *")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

pub async fn find_score(pool: &PgPool, score_id: i64) -> Result<Option<ScoreRow>, sqlx::Error> {
    sqlx::query_as::<_, ScoreRow>("SELECT * FROM scores WHERE id = $1")
        .bind(score_id)
        .fetch_optional(pool)
        .await
}

/// Sets one signal. Returns `None` when the score does not exist.
pub async fn set_signal(
    pool: &PgPool,
    score_id: i64,
    signal: Signal,
    value: f64,
) -> Result<Option<ScoreRow>, sqlx::Error> {
    let sql = format!(
        "UPDATE scores SET {} = $1 WHERE id = $2 RETURNING *",
        signal.column()
    );
    sqlx::query_as::<_, ScoreRow>(&sql)
        .bind(value)
        .bind(score_id)
        .fetch_optional(pool)
        .await
}

pub async fn save_final_result(
    pool: &PgPool,
    score_id: i64,
    update: &FinalResultUpdate<'_>,
) -> Result<Option<ScoreRow>, sqlx::Error> {
    sqlx::query_as::<_, ScoreRow>(
        r#"
        UPDATE scores SET
            final_score = $1,
            emotion = $2,
            recommended_songs = $3,
            solution = $4,
            recommended_movie = COALESCE($5, recommended_movie),
            movie_poster_url = COALESCE($6, movie_poster_url),
            movie_rating_percent = COALESCE($7, movie_rating_percent)
        WHERE id = $8
        RETURNING *
        "#,
    )
    .bind(update.final_score)
    .bind(update.emotion)
    .bind(update.recommended_songs)
    .bind(update.solution)
    .bind(update.recommended_movie)
    .bind(update.movie_poster_url)
    .bind(update.movie_rating_percent)
    .bind(score_id)
    .fetch_optional(pool)
    .await
}

/// Email of the user a score belongs to, if it has one.
pub async fn find_owner_email(
    pool: &PgPool,
    score_id: i64,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT u.email
        FROM scores s
        JOIN users u ON u.id = s.user_id
        WHERE s.id = $1
        "#,
    )
    .bind(score_id)
    .fetch_optional(pool)
    .await
}

use sqlx::PgPool;

use crate::models::record::RecordRow;

pub struct NewRecord<'a> {
    pub email: &'a str,
    pub score_id: i64,
    pub final_score: i32,
    pub emotion_result: &'a str,
    pub recommended_songs: &'a str,
    pub recommended_movie: &'a str,
    pub movie_poster_url: &'a str,
    pub movie_rating_percent: i32,
    pub solution: &'a str,
}

pub async fn insert_record(
    pool: &PgPool,
    record: &NewRecord<'_>,
) -> Result<RecordRow, sqlx::Error> {
    sqlx::query_as::<_, RecordRow>(
        r#"
        INSERT INTO records
            (email, score_id, final_score, emotion_result, recommended_songs,
             recommended_movie, movie_poster_url, movie_rating_percent, solution, favorite)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, FALSE)
        RETURNING *
        "#,
    )
    .bind(record.email)
    .bind(record.score_id)
    .bind(record.final_score)
    .bind(record.emotion_result)
    .bind(record.recommended_songs)
    .bind(record.recommended_movie)
    .bind(record.movie_poster_url)
    .bind(record.movie_rating_percent)
    .bind(record.solution)
    .fetch_one(pool)
    .await
}

/// All records for an email, oldest first.
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Vec<RecordRow>, sqlx::Error> {
    sqlx::query_as::<_, RecordRow>(
        "SELECT * FROM records WHERE email = $1 ORDER BY created_at ASC, id ASC",
    )
    .bind(email)
    .fetch_all(pool)
    .await
}

pub async fn find_latest_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<RecordRow>, sqlx::Error> {
    sqlx::query_as::<_, RecordRow>(
        "SELECT * FROM records WHERE email = $1 ORDER BY created_at DESC, id DESC LIMIT 1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Favourite records, newest first; restricted to `email` when given.
pub async fn find_favorites(
    pool: &PgPool,
    email: Option<&str>,
) -> Result<Vec<RecordRow>, sqlx::Error> {
    sqlx::query_as::<_, RecordRow>(
        r#"
        SELECT * FROM records
        WHERE favorite = TRUE AND ($1::TEXT IS NULL OR email = $1)
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(email)
    .fetch_all(pool)
    .await
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<RecordRow>, sqlx::Error> {
    sqlx::query_as::<_, RecordRow>("SELECT * FROM records ORDER BY id")
        .fetch_all(pool)
        .await
}

/// Returns `false` when the record does not exist.
pub async fn delete_record(pool: &PgPool, record_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM records WHERE id = $1")
        .bind(record_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn set_favorite(
    pool: &PgPool,
    record_id: i64,
    favorite: bool,
) -> Result<Option<RecordRow>, sqlx::Error> {
    sqlx::query_as::<_, RecordRow>("UPDATE records SET favorite = $1 WHERE id = $2 RETURNING *")
        .bind(favorite)
        .bind(record_id)
        .fetch_optional(pool)
        .await
}

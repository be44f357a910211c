use sqlx::PgPool;

use crate::models::step::StepRecordRow;

pub async fn insert_steps(
    pool: &PgPool,
    email: &str,
    steps: i32,
) -> Result<StepRecordRow, sqlx::Error> {
    sqlx::query_as::<_, StepRecordRow>(
        "INSERT INTO step_records (email, steps, date) VALUES ($1, $2, NOW()) RETURNING *",
    )
    .bind(email)
    .bind(steps)
    .fetch_one(pool)
    .await
}

/// Step records for an email, newest first.
pub async fn find_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Vec<StepRecordRow>, sqlx::Error> {
    sqlx::query_as::<_, StepRecordRow>(
        "SELECT * FROM step_records WHERE email = $1 ORDER BY date DESC, id DESC",
    )
    .bind(email)
    .fetch_all(pool)
    .await
}

pub async fn find_latest(
    pool: &PgPool,
    email: &str,
) -> Result<Option<StepRecordRow>, sqlx::Error> {
    sqlx::query_as::<_, StepRecordRow>(
        "SELECT * FROM step_records WHERE email = $1 ORDER BY date DESC, id DESC LIMIT 1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

use sqlx::PgPool;

use crate::models::user::User;

/// Inserts a user unless the email is taken. Returns the new id, or `None` on conflict.
pub async fn insert_user(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    name: Option<&str>,
    phone: Option<&str>,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO users (email, password, name, phone)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .bind(phone)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// First registered user with this name.
pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE name = $1 ORDER BY id LIMIT 1")
        .bind(name)
        .fetch_optional(pool)
        .await
}

pub async fn find_emails_by_name_and_phone(
    pool: &PgPool,
    name: &str,
    phone: &str,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT email FROM users WHERE name = $1 AND phone = $2 ORDER BY id")
        .bind(name)
        .bind(phone)
        .fetch_all(pool)
        .await
}

/// Returns `false` when no user has this email.
pub async fn update_password(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET password = $1 WHERE email = $2")
        .bind(password_hash)
        .bind(email)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Returns `false` when no user has this email.
pub async fn update_profile(
    pool: &PgPool,
    email: &str,
    name: &str,
    phone: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET name = $1, phone = $2 WHERE email = $3")
        .bind(name)
        .bind(phone)
        .bind(email)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

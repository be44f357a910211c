use anyhow::{Context, Result};

/// Hashes a plaintext password with bcrypt's default cost.
/// bcrypt is CPU-bound, so this runs on the blocking pool.
pub async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .context("password hashing task failed")?
        .context("failed to hash password")
}

/// Checks a plaintext password against a stored bcrypt hash.
/// A malformed hash counts as a mismatch.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    let verified =
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
            .await
            .context("password verification task failed")?;
    Ok(verified)
}

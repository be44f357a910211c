use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub tmdb_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Interpreter used to run the inference scripts.
    pub python_bin: String,
    pub scripts_dir: PathBuf,
    /// Where uploaded media is staged while a script reads it.
    pub upload_dir: PathBuf,
    pub script_timeout: Duration,
    /// Request body cap for media uploads.
    pub max_upload_bytes: usize,
    /// Owner email written to history records when a score has no user.
    pub fallback_record_email: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            tmdb_api_key: require_env("TMDB_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            python_bin: std::env::var("PYTHON_BIN").unwrap_or_else(|_| "python3".to_string()),
            scripts_dir: std::env::var("SCRIPTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("scripts")),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir()),
            script_timeout: Duration::from_secs(
                std::env::var("SCRIPT_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "120".to_string())
                    .parse::<u64>()
                    .context("SCRIPT_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            max_upload_bytes: std::env::var("MAX_UPLOAD_MB")
                .unwrap_or_else(|_| "200".to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_MB must be a whole number of megabytes")?
                * 1024
                * 1024,
            fallback_record_email: std::env::var("FALLBACK_RECORD_EMAIL")
                .unwrap_or_else(|_| "anonymous@example.com".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

use std::path::Path;

use axum::extract::Multipart;
use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::AppError;

/// A media upload plus the score session it belongs to.
#[derive(Debug)]
pub struct MediaUpload {
    pub file_name: Option<String>,
    pub data: Bytes,
    pub score_id: i64,
}

/// Reads the `file` and `scoreId` parts of a multipart form. Other parts are ignored.
pub async fn read_media_upload(mut multipart: Multipart) -> Result<MediaUpload, AppError> {
    let mut file: Option<(Option<String>, Bytes)> = None;
    let mut score_id: Option<i64> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let name = field.file_name().map(String::from);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
                file = Some((name, data));
            }
            Some("scoreId") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read scoreId: {e}")))?;
                score_id = Some(parse_score_id(&text)?);
            }
            other => debug!("Ignoring multipart field {other:?}"),
        }
    }

    let (file_name, data) =
        file.ok_or_else(|| AppError::Validation("file part is required".to_string()))?;
    if data.is_empty() {
        return Err(AppError::Validation("uploaded file is empty".to_string()));
    }
    let score_id =
        score_id.ok_or_else(|| AppError::Validation("scoreId is required".to_string()))?;

    Ok(MediaUpload {
        file_name,
        data,
        score_id,
    })
}

pub fn parse_score_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::Validation(format!("scoreId must be an integer, got '{raw}'")))
}

/// Writes the upload to a uniquely named file under `dir`.
/// The file is removed when the returned handle is dropped.
pub async fn stage_upload(
    dir: &Path,
    prefix: &str,
    extension: &str,
    data: &Bytes,
) -> Result<NamedTempFile, AppError> {
    let staged = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(extension)
        .tempfile_in(dir)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create upload file: {e}")))?;
    tokio::fs::write(staged.path(), data)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to write upload file: {e}")))?;
    debug!("Staged {} bytes at {}", data.len(), staged.path().display());
    Ok(staged)
}

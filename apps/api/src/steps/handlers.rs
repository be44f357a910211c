use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::AppError;
use crate::models::step::StepRecordRow;
use crate::state::AppState;
use crate::steps::repo;

/// Body of `POST /api/steps/save`. `steps` may arrive as any JSON number.
#[derive(Debug, Deserialize)]
pub struct SaveStepsRequest {
    pub email: Option<String>,
    pub steps: Option<Value>,
}

impl SaveStepsRequest {
    /// Validated `(email, steps)`; fractional counts are truncated.
    pub fn validate(&self) -> Result<(&str, i32), AppError> {
        let email = self
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::Validation("email is required".to_string()))?;

        let steps = self
            .steps
            .as_ref()
            .and_then(Value::as_f64)
            .ok_or_else(|| AppError::Validation("steps must be a number".to_string()))?;
        if !(0.0..=i32::MAX as f64).contains(&steps) {
            return Err(AppError::Validation("steps is out of range".to_string()));
        }

        Ok((email, steps as i32))
    }
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// POST /api/steps/save
pub async fn handle_save_steps(
    State(state): State<AppState>,
    Json(req): Json<SaveStepsRequest>,
) -> Result<&'static str, AppError> {
    let (email, steps) = req.validate()?;
    let row = repo::insert_steps(&state.db, email, steps).await?;
    debug!("Saved {} steps for {} (id {})", row.steps, row.email, row.id);
    Ok("걸음 수 저장 완료")
}

/// GET /api/steps?email=
pub async fn handle_list_steps(
    State(state): State<AppState>,
    Query(params): Query<EmailQuery>,
) -> Result<Json<Vec<StepRecordRow>>, AppError> {
    Ok(Json(repo::find_by_email(&state.db, &params.email).await?))
}

/// GET /api/steps/latest?email=
pub async fn handle_latest_steps(
    State(state): State<AppState>,
    Query(params): Query<EmailQuery>,
) -> Result<Json<StepRecordRow>, AppError> {
    let latest = repo::find_latest(&state.db, &params.email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No step records for {}", params.email)))?;
    Ok(Json(latest))
}

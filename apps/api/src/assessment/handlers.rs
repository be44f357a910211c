//! Axum route handlers for assessment sessions: creation, signal uploads,
//! questionnaire scoring and final results.

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assessment::repo::{self, Signal};
use crate::assessment::scoring::question_score_from_answers;
use crate::assessment::service::{
    analyze_staged_audio, analyze_staged_video, complete_assessment, recommend_from_average,
    AverageRecommendation, FinalAssessment,
};
use crate::assessment::uploads::read_media_upload;
use crate::auth::repo as users;
use crate::errors::AppError;
use crate::models::score::ScoreRow;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct InitScoreRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreIdQuery {
    pub score_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSubmitQuery {
    pub score: f64,
    pub score_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnswersRequest {
    pub answers: String,
    pub score_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionScoreResponse {
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub score_id: Option<i64>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/score/new
///
/// Creates an anonymous, empty session.
pub async fn handle_new_session(
    State(state): State<AppState>,
) -> Result<Json<ScoreRow>, AppError> {
    let score = repo::create_score(&state.db, None).await?;
    info!("Created anonymous score session {}", score.id);
    Ok(Json(score))
}

/// POST /api/scores/init
///
/// Creates a session owned by the user with the given email; returns its id.
pub async fn handle_init_score(
    State(state): State<AppState>,
    Json(req): Json<InitScoreRequest>,
) -> Result<Json<i64>, AppError> {
    let email = req
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Validation("이메일 누락".to_string()))?;

    let user = users::find_by_email(&state.db, email)
        .await?
        .ok_or_else(|| AppError::Validation("사용자 없음".to_string()))?;

    let score = repo::create_score(&state.db, Some(user.id)).await?;
    info!("Created score session {} for user {}", score.id, user.id);
    Ok(Json(score.id))
}

/// POST /api/question/submit?score=&scoreId=
pub async fn handle_submit_question(
    State(state): State<AppState>,
    Query(params): Query<QuestionSubmitQuery>,
) -> Result<Json<ScoreRow>, AppError> {
    if !params.score.is_finite() {
        return Err(AppError::Validation("score must be a finite number".to_string()));
    }
    let score = repo::set_signal(&state.db, params.score_id, Signal::Question, params.score)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Score {} not found", params.score_id)))?;
    Ok(Json(score))
}

/// POST /api/question/calculate
///
/// Scores a comma-separated yes/no answer list (20 points per yes) and,
/// when `scoreId` is given, stores it as the session's questionnaire score.
pub async fn handle_calculate_question(
    State(state): State<AppState>,
    Json(req): Json<QuestionAnswersRequest>,
) -> Result<Json<QuestionScoreResponse>, AppError> {
    if req.answers.trim().is_empty() {
        return Err(AppError::Validation("answers cannot be empty".to_string()));
    }
    let score = question_score_from_answers(&req.answers);

    if let Some(score_id) = req.score_id {
        repo::set_signal(&state.db, score_id, Signal::Question, score)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Score {score_id} not found")))?;
    }

    Ok(Json(QuestionScoreResponse {
        score,
        score_id: req.score_id,
    }))
}

/// POST /api/audio (multipart: `file`, `scoreId`)
pub async fn handle_audio_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<String, AppError> {
    let upload = read_media_upload(multipart).await?;
    if repo::find_score(&state.db, upload.score_id).await?.is_none() {
        return Err(AppError::Validation("해당 scoreId 없음".to_string()));
    }
    info!(
        "Audio upload for score {} ({:?}, {} bytes)",
        upload.score_id,
        upload.file_name,
        upload.data.len()
    );

    let voice_score = analyze_staged_audio(
        state.analyzer.as_ref(),
        &state.config.upload_dir,
        &upload.data,
    )
    .await?;
    info!("Voice score for {}: {voice_score}", upload.score_id);

    let updated = repo::set_signal(&state.db, upload.score_id, Signal::Voice, voice_score).await?;
    require_upload_target(updated)?;
    Ok("업데이트 성공".to_string())
}

/// POST /api/video (multipart: `file`, `scoreId`)
///
/// Unlike audio, an empty or unparseable script result stores 0.0.
pub async fn handle_video_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<String, AppError> {
    let upload = read_media_upload(multipart).await?;
    if repo::find_score(&state.db, upload.score_id).await?.is_none() {
        return Err(AppError::Validation("해당 scoreId 없음".to_string()));
    }
    info!(
        "Video upload for score {} ({:?}, {} bytes)",
        upload.score_id,
        upload.file_name,
        upload.data.len()
    );

    let face_score = analyze_staged_video(
        state.analyzer.as_ref(),
        &state.config.upload_dir,
        &upload.data,
    )
    .await?;
    info!("Face score for {}: {face_score}", upload.score_id);

    let updated = repo::set_signal(&state.db, upload.score_id, Signal::Face, face_score).await?;
    require_upload_target(updated)?;
    Ok(video_reply(face_score))
}

/// The score row can disappear while the script runs; that is the same
/// client error as uploading against an unknown id.
fn require_upload_target(updated: Option<ScoreRow>) -> Result<ScoreRow, AppError> {
    updated.ok_or_else(|| AppError::Validation("해당 scoreId 없음".to_string()))
}

fn video_reply(face_score: f64) -> String {
    format!("업데이트 성공 (점수: {face_score:?})")
}

/// POST /api/final/calculate?scoreId=
pub async fn handle_calculate_final(
    State(state): State<AppState>,
    Query(params): Query<ScoreIdQuery>,
) -> Result<Json<FinalAssessment>, AppError> {
    Ok(Json(complete_assessment(&state, params.score_id).await?))
}

/// GET /api/final/get?scoreId=
pub async fn handle_get_final(
    State(state): State<AppState>,
    Query(params): Query<ScoreIdQuery>,
) -> Result<Json<FinalAssessment>, AppError> {
    let score = repo::find_score(&state.db, params.score_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Score not found".to_string()))?;
    Ok(Json(FinalAssessment::from(&score)))
}

/// POST /api/scores/recommend
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<AverageRecommendation>, AppError> {
    let score_id = req
        .score_id
        .ok_or_else(|| AppError::Validation("scoreId 누락".to_string()))?;
    Ok(Json(recommend_from_average(&state, score_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_reply_keeps_decimal_point() {
        assert_eq!(video_reply(0.0), "업데이트 성공 (점수: 0.0)");
        assert_eq!(video_reply(72.5), "업데이트 성공 (점수: 72.5)");
    }

    #[test]
    fn test_vanished_score_row_is_client_error() {
        let err = require_upload_target(None).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg == "해당 scoreId 없음"));
    }

    #[test]
    fn test_question_submit_query_uses_camel_case() {
        let q: QuestionSubmitQuery = serde_json::from_str(r#"{"score":40.0,"scoreId":3}"#).unwrap();
        assert_eq!(q.score_id, 3);
        assert_eq!(q.score, 40.0);
    }

    #[test]
    fn test_question_response_omits_missing_score_id() {
        let json = serde_json::to_value(QuestionScoreResponse {
            score: 60.0,
            score_id: None,
        })
        .unwrap();
        assert_eq!(json["score"], 60.0);
        assert!(json.get("scoreId").is_none());
    }
}

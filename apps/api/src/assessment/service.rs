//! Completing an assessment: score → emotion → recommendations → history.

use std::path::Path;

use bytes::Bytes;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::analyzer::parse::Recommendation;
use crate::analyzer::EmotionAnalyzer;
use crate::assessment::emotion::Emotion;
use crate::assessment::repo::{self, FinalResultUpdate};
use crate::assessment::scoring::{
    compute_average_score, compute_final_score, emotion_for_average_score,
    emotion_for_final_score, ScoringWeights,
};
use crate::assessment::solutions::random_solution;
use crate::assessment::uploads::stage_upload;
use crate::errors::AppError;
use crate::models::score::ScoreRow;
use crate::records::repo::{insert_record, NewRecord};
use crate::recommend::tmdb::MovieDto;
use crate::state::AppState;

/// Outcome of `/api/final/*`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalAssessment {
    pub final_score: Option<i32>,
    pub emotion: Option<String>,
    pub recommended_songs: Option<String>,
    pub recommended_movie: Option<String>,
    pub movie_poster_url: Option<String>,
    pub movie_rating_percent: Option<i32>,
    pub solution: Option<String>,
}

impl From<&ScoreRow> for FinalAssessment {
    fn from(s: &ScoreRow) -> Self {
        Self {
            final_score: s.final_score,
            emotion: s.emotion.clone(),
            recommended_songs: s.recommended_songs.clone(),
            recommended_movie: s.recommended_movie.clone(),
            movie_poster_url: s.movie_poster_url.clone(),
            movie_rating_percent: s.movie_rating_percent,
            solution: s.solution.clone(),
        }
    }
}

/// Outcome of `/api/scores/recommend`. Movie fields are absent when TMDB had nothing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageRecommendation {
    pub emotion: Emotion,
    pub final_score: i32,
    pub songs: String,
    pub solution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_rating_percent: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_overview: Option<String>,
}

impl AverageRecommendation {
    pub fn new(
        emotion: Emotion,
        final_score: i32,
        songs: String,
        solution: String,
        movie: Option<MovieDto>,
    ) -> Self {
        let (movie_title, movie_poster_url, movie_rating_percent, movie_overview) = match movie {
            Some(m) => (
                Some(m.title),
                Some(m.poster_url),
                Some(m.rating_percent),
                Some(m.overview),
            ),
            None => (None, None, None, None),
        };
        Self {
            emotion,
            final_score,
            songs,
            solution,
            movie_title,
            movie_poster_url,
            movie_rating_percent,
            movie_overview,
        }
    }
}

/// Weighted composite of a session's signals and the emotion it maps to.
pub fn final_outcome(score: &ScoreRow, weights: &ScoringWeights) -> (i32, Emotion) {
    let final_score = compute_final_score(
        score.face_score,
        score.voice_score,
        score.question_score,
        weights,
    );
    (final_score, emotion_for_final_score(final_score))
}

/// Face/voice average and its emotion; both signals are required.
pub fn average_outcome(score: &ScoreRow) -> Result<(i32, Emotion), AppError> {
    match (score.voice_score, score.face_score) {
        (Some(voice), Some(face)) => {
            let average = compute_average_score(voice, face);
            Ok((average, emotion_for_average_score(average)))
        }
        _ => Err(AppError::Validation(
            "voiceScore 또는 faceScore 없음".to_string(),
        )),
    }
}

/// Computes the final score, fetches recommendations, stores the result on
/// the session and appends a history record.
///
/// Recommendation failures degrade to a placeholder; a failed history insert
/// is logged and does not fail the request.
pub async fn complete_assessment(
    state: &AppState,
    score_id: i64,
) -> Result<FinalAssessment, AppError> {
    let score = repo::find_score(&state.db, score_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Score not found".to_string()))?;

    let (final_score, emotion) = final_outcome(&score, &state.weights);
    info!("Score {score_id}: final={final_score} emotion={emotion}");

    let recommendation = recommendation_or_placeholder(state.analyzer.as_ref(), emotion).await;
    let solution = random_solution(emotion.as_str());

    let updated = repo::save_final_result(
        &state.db,
        score_id,
        &FinalResultUpdate {
            final_score,
            emotion: emotion.as_str(),
            recommended_songs: &recommendation.songs,
            solution: &solution,
            recommended_movie: Some(&recommendation.movie_title),
            movie_poster_url: Some(&recommendation.poster_url),
            movie_rating_percent: Some(recommendation.rating_percent),
        },
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Score not found".to_string()))?;

    let email =
        record_owner_email(&state.db, score_id, &state.config.fallback_record_email).await;
    let record = NewRecord {
        email: &email,
        score_id,
        final_score,
        emotion_result: emotion.as_str(),
        recommended_songs: &recommendation.songs,
        recommended_movie: &recommendation.movie_title,
        movie_poster_url: &recommendation.poster_url,
        movie_rating_percent: recommendation.rating_percent,
        solution: &solution,
    };
    append_history(&state.db, &record).await;

    Ok(FinalAssessment::from(&updated))
}

/// Runs the recommendation script, substituting the `추천 실패` placeholder
/// when it cannot produce anything.
pub async fn recommendation_or_placeholder(
    analyzer: &dyn EmotionAnalyzer,
    emotion: Emotion,
) -> Recommendation {
    match analyzer.recommend(emotion).await {
        Ok(rec) => rec,
        Err(e) => {
            warn!("Recommendation script failed for {emotion}: {e}");
            Recommendation::failed()
        }
    }
}

/// Email a history record is filed under: the score owner's, else `fallback`.
/// A failed lookup also falls back.
pub async fn record_owner_email(pool: &PgPool, score_id: i64, fallback: &str) -> String {
    match repo::find_owner_email(pool, score_id).await {
        Ok(Some(email)) => email,
        Ok(None) => fallback.to_string(),
        Err(e) => {
            warn!("Could not look up owner of score {score_id}: {e}");
            fallback.to_string()
        }
    }
}

/// Inserts a history record. Failure is logged only; returns the new id on success.
pub async fn append_history(pool: &PgPool, record: &NewRecord<'_>) -> Option<i64> {
    match insert_record(pool, record).await {
        Ok(row) => {
            info!("Saved record {} for {}", row.id, record.email);
            Some(row.id)
        }
        Err(e) => {
            warn!("Failed to save record for score {}: {e}", record.score_id);
            None
        }
    }
}

/// Stages an audio upload, scores it, and removes the staged file.
pub async fn analyze_staged_audio(
    analyzer: &dyn EmotionAnalyzer,
    upload_dir: &Path,
    data: &Bytes,
) -> Result<f64, AppError> {
    let staged = stage_upload(upload_dir, "audio-", ".wav", data).await?;
    // `staged` is deleted on drop, on the error path too.
    Ok(analyzer.analyze_audio(staged.path()).await?)
}

/// Stages a video upload and scores it. No usable score becomes 0.0.
pub async fn analyze_staged_video(
    analyzer: &dyn EmotionAnalyzer,
    upload_dir: &Path,
    data: &Bytes,
) -> Result<f64, AppError> {
    let staged = stage_upload(upload_dir, "video-", ".mp4", data).await?;
    match analyzer.analyze_video(staged.path()).await? {
        Some(score) => Ok(score),
        None => {
            warn!("Video script gave no usable score; storing 0.0");
            Ok(0.0)
        }
    }
}

/// Recommendation from the face/voice average alone.
pub async fn recommend_from_average(
    state: &AppState,
    score_id: i64,
) -> Result<AverageRecommendation, AppError> {
    let score = repo::find_score(&state.db, score_id)
        .await?
        .ok_or_else(|| AppError::Validation("Score ID 없음".to_string()))?;

    let (final_score, emotion) = average_outcome(&score)?;

    let songs = state.analyzer.recommend(emotion).await?.songs;
    let movie = state
        .movies
        .recommend_movies(emotion.as_str(), 1)
        .await?
        .into_iter()
        .next();
    let solution = random_solution(emotion.as_str());

    repo::save_final_result(
        &state.db,
        score_id,
        &FinalResultUpdate {
            final_score,
            emotion: emotion.as_str(),
            recommended_songs: &songs,
            solution: &solution,
            recommended_movie: movie.as_ref().map(|m| m.title.as_str()),
            movie_poster_url: movie.as_ref().map(|m| m.poster_url.as_str()),
            movie_rating_percent: movie.as_ref().map(|m| m.rating_percent),
        },
    )
    .await?;

    Ok(AverageRecommendation::new(
        emotion,
        final_score,
        songs,
        solution,
        movie,
    ))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::testing::{unreachable_pool, FakeAnalyzer};

    fn score(face: Option<f64>, voice: Option<f64>, question: Option<f64>) -> ScoreRow {
        ScoreRow {
            id: 1,
            user_id: None,
            face_score: face,
            voice_score: voice,
            question_score: question,
            final_score: None,
            recommended_songs: None,
            emotion: None,
            favorite: false,
            solution: None,
            recommended_movie: None,
            movie_poster_url: None,
            movie_rating_percent: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_failed_recommendation_becomes_placeholder() {
        let rec = recommendation_or_placeholder(&FakeAnalyzer::failing(), Emotion::Sadness).await;
        assert_eq!(rec, Recommendation::failed());
        assert_eq!(rec.songs, "추천 실패");
        assert_eq!(rec.movie_title, "추천 실패");
        assert_eq!(rec.poster_url, "");
        assert_eq!(rec.rating_percent, 0);
    }

    #[tokio::test]
    async fn test_successful_recommendation_passes_through() {
        let rec =
            recommendation_or_placeholder(&FakeAnalyzer::default(), Emotion::Anxiety).await;
        assert_eq!(rec.songs, "songs for Anxiety");
        assert_eq!(rec.rating_percent, 80);
    }

    #[tokio::test]
    async fn test_owner_lookup_failure_uses_fallback_email() {
        let email = record_owner_email(&unreachable_pool(), 7, "anonymous@example.com").await;
        assert_eq!(email, "anonymous@example.com");
    }

    #[tokio::test]
    async fn test_history_insert_failure_is_swallowed() {
        let record = NewRecord {
            email: "a@b.c",
            score_id: 7,
            final_score: 42,
            emotion_result: "Sadness",
            recommended_songs: "s",
            recommended_movie: "m",
            movie_poster_url: "",
            movie_rating_percent: 0,
            solution: "x",
        };
        assert_eq!(append_history(&unreachable_pool(), &record).await, None);
    }

    #[tokio::test]
    async fn test_staged_audio_is_removed_after_scoring() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = FakeAnalyzer {
            audio_score: 63.0,
            ..FakeAnalyzer::default()
        };
        let data = Bytes::from_static(b"RIFF");

        let score = analyze_staged_audio(&analyzer, dir.path(), &data).await.unwrap();
        assert_eq!(score, 63.0);

        let seen = analyzer.seen();
        assert_eq!(seen.len(), 1);
        let (path, existed) = &seen[0];
        assert!(existed, "file must exist while the script reads it");
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_staged_audio_is_removed_when_script_fails() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = FakeAnalyzer::failing();
        let data = Bytes::from_static(b"RIFF");

        let err = analyze_staged_audio(&analyzer, dir.path(), &data)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Script(_)));
        assert!(!analyzer.seen()[0].0.exists());
    }

    #[tokio::test]
    async fn test_video_without_score_stores_zero_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = FakeAnalyzer::default();
        let data = Bytes::from_static(b"\x00\x00\x00\x18ftypmp42");

        let score = analyze_staged_video(&analyzer, dir.path(), &data).await.unwrap();
        assert_eq!(score, 0.0);

        let (path, existed) = &analyzer.seen()[0];
        assert!(existed);
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_video_score_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = FakeAnalyzer {
            video_score: Some(41.5),
            ..FakeAnalyzer::default()
        };
        let data = Bytes::from_static(b"x");
        let score = analyze_staged_video(&analyzer, dir.path(), &data).await.unwrap();
        assert_eq!(score, 41.5);
    }

    #[test]
    fn test_final_outcome_uses_weights() {
        let s = score(Some(90.0), Some(80.0), Some(60.0));
        // 36 + 32 + 12 = 80
        assert_eq!(
            final_outcome(&s, &ScoringWeights::default()),
            (80, Emotion::Anger)
        );
    }

    #[test]
    fn test_final_outcome_with_only_questionnaire() {
        let s = score(None, None, Some(100.0));
        assert_eq!(
            final_outcome(&s, &ScoringWeights::default()),
            (20, Emotion::Normal)
        );
    }

    #[test]
    fn test_average_outcome_requires_both_signals() {
        assert!(matches!(
            average_outcome(&score(Some(50.0), None, None)),
            Err(AppError::Validation(_))
        ));
        assert_eq!(
            average_outcome(&score(Some(70.0), Some(72.0), None)).unwrap(),
            (71, Emotion::Anxiety)
        );
    }

    #[test]
    fn test_final_assessment_json_keys() {
        let mut s = score(None, None, None);
        s.final_score = Some(55);
        s.emotion = Some("Anxiety".into());
        s.movie_rating_percent = Some(64);
        let json = serde_json::to_value(FinalAssessment::from(&s)).unwrap();
        assert_eq!(json["finalScore"], 55);
        assert_eq!(json["emotion"], "Anxiety");
        assert_eq!(json["movieRatingPercent"], 64);
        assert!(json["recommendedSongs"].is_null());
    }

    #[test]
    fn test_average_recommendation_omits_missing_movie() {
        let rec = AverageRecommendation::new(Emotion::Normal, 10, "s".into(), "m".into(), None);
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["emotion"], "Normal");
        assert!(json.get("movieTitle").is_none());

        let movie = MovieDto {
            title: "T".into(),
            poster_url: "p".into(),
            overview: "o".into(),
            rating_percent: 80,
        };
        let rec = AverageRecommendation::new(Emotion::Anger, 90, "s".into(), "m".into(), Some(movie));
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["movieTitle"], "T");
        assert_eq!(json["movieOverview"], "o");
    }
}

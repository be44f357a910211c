pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};

use crate::assessment::handlers as assessment;
use crate::auth::handlers as auth;
use crate::recommend::handlers as recommend;
use crate::records::handlers as records;
use crate::state::AppState;
use crate::steps::handlers as steps;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/api/auth/signup", post(auth::handle_signup))
        .route("/api/auth/login", post(auth::handle_login))
        .route(
            "/api/auth/change-password",
            post(auth::handle_change_password),
        )
        .route("/api/auth/find-email", get(auth::handle_find_email))
        .route("/api/auth/find-emails", get(auth::handle_find_emails))
        .route(
            "/api/auth/send-verification-code",
            post(auth::handle_send_verification_code),
        )
        .route(
            "/api/auth/reset-password",
            post(auth::handle_reset_password),
        )
        .route(
            "/api/auth/user-info",
            get(auth::handle_get_user_info).put(auth::handle_update_user_info),
        )
        // Assessment sessions
        .route("/api/score/new", post(assessment::handle_new_session))
        .route("/api/scores/init", post(assessment::handle_init_score))
        .route("/api/scores/recommend", post(assessment::handle_recommend))
        .route(
            "/api/question/submit",
            post(assessment::handle_submit_question),
        )
        .route(
            "/api/question/calculate",
            post(assessment::handle_calculate_question),
        )
        .route(
            "/api/audio",
            post(assessment::handle_audio_upload).layer(upload_limit),
        )
        .route(
            "/api/video",
            post(assessment::handle_video_upload).layer(upload_limit),
        )
        .route(
            "/api/final/calculate",
            post(assessment::handle_calculate_final),
        )
        .route("/api/final/get", get(assessment::handle_get_final))
        // Recommendations
        .route(
            "/api/recommendations/movies",
            get(recommend::handle_get_movies),
        )
        // History
        .route("/api/records", get(records::handle_list_records))
        .route("/api/records/all", get(records::handle_all_records))
        .route("/api/records/favorites", get(records::handle_favorite_records))
        .route("/api/records/latest", get(records::handle_latest_record))
        .route("/api/records/:id", delete(records::handle_delete_record))
        .route(
            "/api/records/:id/favorite",
            patch(records::handle_update_favorite),
        )
        // Steps
        .route("/api/steps", get(steps::handle_list_steps))
        .route("/api/steps/save", post(steps::handle_save_steps))
        .route("/api/steps/latest", get(steps::handle_latest_steps))
        .with_state(state)
}

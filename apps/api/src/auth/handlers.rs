//! Axum route handlers for the account API (`/api/auth/*`).
//!
//! Responses keep the `{status, message}` / `{message}` bodies mobile clients
//! already parse; only database failures fall through to `AppError`.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo;
use crate::errors::AppError;
use crate::state::AppState;

type JsonReply = (StatusCode, Json<Value>);

fn reply(status: StatusCode, body: Value) -> JsonReply {
    (status, Json(body))
}

fn any_blank(fields: &[&str]) -> bool {
    fields.iter().any(|f| f.trim().is_empty())
}

/// Emails are keys for lookups and reset codes; surrounding whitespace is dropped on the way in.
fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(String::deserialize(deserializer)?.trim().to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    #[serde(default, deserialize_with = "trimmed")]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default, deserialize_with = "trimmed")]
    pub email: String,
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    #[serde(default, deserialize_with = "trimmed")]
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default, deserialize_with = "trimmed")]
    pub email: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserInfoRequest {
    #[serde(default, deserialize_with = "trimmed")]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct NamePhoneQuery {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    #[serde(deserialize_with = "trimmed")]
    pub email: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(req): Json<AuthRequest>,
) -> Result<JsonReply, AppError> {
    if any_blank(&[&req.email, &req.password]) {
        return Ok(reply(
            StatusCode::BAD_REQUEST,
            json!({"status": "fail", "message": "이메일과 비밀번호를 입력해주세요."}),
        ));
    }

    let hash = hash_password(&req.password).await?;
    let created = repo::insert_user(
        &state.db,
        &req.email,
        &hash,
        req.name.as_deref(),
        req.phone.as_deref(),
    )
    .await?;

    match created {
        Some(id) => {
            info!("Registered user {id} ({})", req.email);
            Ok(reply(
                StatusCode::OK,
                json!({"status": "success", "message": "회원가입 성공"}),
            ))
        }
        None => Ok(reply(
            StatusCode::BAD_REQUEST,
            json!({"status": "fail", "message": "이미 존재하는 이메일입니다."}),
        )),
    }
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<AuthRequest>,
) -> Result<JsonReply, AppError> {
    let fail = || {
        reply(
            StatusCode::UNAUTHORIZED,
            json!({
                "status": "fail",
                "message": "로그인 실패: 이메일 또는 비밀번호가 올바르지 않습니다."
            }),
        )
    };

    if any_blank(&[&req.email, &req.password]) {
        return Ok(fail());
    }

    let Some(user) = repo::find_by_email(&state.db, &req.email).await? else {
        return Ok(fail());
    };
    if !verify_password(&req.password, &user.password).await? {
        return Ok(fail());
    }

    Ok(reply(
        StatusCode::OK,
        json!({"status": "success", "message": "로그인 성공", "email": user.email}),
    ))
}

/// POST /api/auth/change-password
pub async fn handle_change_password(
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<JsonReply, AppError> {
    let fail = || {
        reply(
            StatusCode::BAD_REQUEST,
            json!({"message": "비밀번호 변경 실패: 현재 비밀번호 불일치 또는 사용자 없음"}),
        )
    };

    if any_blank(&[&req.email, &req.current_password, &req.new_password]) {
        return Ok(fail());
    }

    let Some(user) = repo::find_by_email(&state.db, &req.email).await? else {
        return Ok(fail());
    };
    if !verify_password(&req.current_password, &user.password).await? {
        return Ok(fail());
    }

    let hash = hash_password(&req.new_password).await?;
    repo::update_password(&state.db, &user.email, &hash).await?;
    info!("Password changed for {}", user.email);

    Ok(reply(StatusCode::OK, json!({"message": "비밀번호 변경 성공"})))
}

/// GET /api/auth/find-email?name=
pub async fn handle_find_email(
    State(state): State<AppState>,
    Query(params): Query<NameQuery>,
) -> Result<JsonReply, AppError> {
    match repo::find_by_name(&state.db, &params.name).await? {
        Some(user) => Ok(reply(StatusCode::OK, json!({"email": user.email}))),
        None => Ok(reply(
            StatusCode::NOT_FOUND,
            json!({"message": "해당 이름의 사용자를 찾을 수 없습니다."}),
        )),
    }
}

/// GET /api/auth/find-emails?name=&phone=
pub async fn handle_find_emails(
    State(state): State<AppState>,
    Query(params): Query<NamePhoneQuery>,
) -> Result<JsonReply, AppError> {
    let emails =
        repo::find_emails_by_name_and_phone(&state.db, &params.name, &params.phone).await?;
    if emails.is_empty() {
        return Ok(reply(
            StatusCode::NOT_FOUND,
            json!({"message": "해당 정보의 사용자를 찾을 수 없습니다."}),
        ));
    }
    Ok(reply(StatusCode::OK, json!({"emails": emails})))
}

/// POST /api/auth/send-verification-code
///
/// No mail is sent: the code is logged and echoed in the response.
pub async fn handle_send_verification_code(
    State(state): State<AppState>,
    Json(req): Json<EmailRequest>,
) -> Result<JsonReply, AppError> {
    if any_blank(&[&req.email]) {
        return Ok(reply(
            StatusCode::BAD_REQUEST,
            json!({"message": "이메일을 입력해주세요."}),
        ));
    }

    if repo::find_by_email(&state.db, &req.email).await?.is_none() {
        return Ok(reply(
            StatusCode::NOT_FOUND,
            json!({"message": "해당 이메일의 사용자를 찾을 수 없습니다."}),
        ));
    }

    let code = state.verification_codes.issue(&req.email);
    info!("[{}] password reset verification code: {code}", req.email);

    Ok(reply(
        StatusCode::OK,
        json!({"message": "인증 코드가 발송되었습니다.", "code": code}),
    ))
}

/// POST /api/auth/reset-password
pub async fn handle_reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<JsonReply, AppError> {
    if any_blank(&[&req.email, &req.code, &req.new_password]) {
        return Ok(reply(
            StatusCode::BAD_REQUEST,
            json!({"message": "이메일, 인증 코드 및 새 비밀번호를 모두 입력해주세요."}),
        ));
    }

    if !state.verification_codes.verify(&req.email, &req.code) {
        return Ok(reply(
            StatusCode::BAD_REQUEST,
            json!({"message": "인증 코드가 유효하지 않습니다."}),
        ));
    }

    let hash = hash_password(&req.new_password).await?;
    if !repo::update_password(&state.db, &req.email, &hash).await? {
        return Ok(reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"message": "비밀번호 재설정 중 오류가 발생했습니다."}),
        ));
    }
    state.verification_codes.remove(&req.email);
    info!("Password reset for {}", req.email);

    Ok(reply(
        StatusCode::OK,
        json!({"message": "비밀번호가 성공적으로 재설정되었습니다."}),
    ))
}

/// GET /api/auth/user-info?email=
pub async fn handle_get_user_info(
    State(state): State<AppState>,
    Query(params): Query<EmailQuery>,
) -> Result<JsonReply, AppError> {
    match repo::find_by_email(&state.db, &params.email).await? {
        Some(user) => Ok(reply(
            StatusCode::OK,
            json!({"name": user.name, "phone": user.phone, "email": user.email}),
        )),
        None => Ok(reply(
            StatusCode::NOT_FOUND,
            json!({"message": "해당 이메일의 사용자를 찾을 수 없습니다."}),
        )),
    }
}

/// PUT /api/auth/user-info
pub async fn handle_update_user_info(
    State(state): State<AppState>,
    Json(req): Json<UpdateUserInfoRequest>,
) -> Result<JsonReply, AppError> {
    if any_blank(&[&req.email, &req.name, &req.phone]) {
        return Ok(reply(
            StatusCode::BAD_REQUEST,
            json!({"message": "이메일, 이름, 전화번호를 모두 입력해주세요."}),
        ));
    }

    if !repo::update_profile(&state.db, &req.email, &req.name, &req.phone).await? {
        return Ok(reply(
            StatusCode::NOT_FOUND,
            json!({"message": "해당 이메일의 사용자를 찾을 수 없습니다."}),
        ));
    }

    Ok(reply(
        StatusCode::OK,
        json!({"message": "사용자 정보가 성공적으로 업데이트되었습니다."}),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_blank() {
        assert!(any_blank(&["a", " "]));
        assert!(any_blank(&[""]));
        assert!(!any_blank(&["a", "b"]));
    }

    #[test]
    fn test_change_password_request_is_camel_case() {
        let req: ChangePasswordRequest = serde_json::from_str(
            r#"{"email":"a@b.c","currentPassword":"old","newPassword":"new"}"#,
        )
        .unwrap();
        assert_eq!(req.current_password, "old");
        assert_eq!(req.new_password, "new");
    }

    #[test]
    fn test_emails_are_trimmed_for_every_request() {
        let auth: AuthRequest =
            serde_json::from_str(r#"{"email":"  a@b.c ","password":"pw"}"#).unwrap();
        assert_eq!(auth.email, "a@b.c");

        let change: ChangePasswordRequest = serde_json::from_str(
            r#"{"email":" a@b.c","currentPassword":"old","newPassword":"new"}"#,
        )
        .unwrap();
        assert_eq!(change.email, "a@b.c");

        let send: EmailRequest = serde_json::from_str(r#"{"email":"a@b.c\t"}"#).unwrap();
        assert_eq!(send.email, "a@b.c");

        let reset: ResetPasswordRequest =
            serde_json::from_str(r#"{"email":" a@b.c ","code":"0042","newPassword":"pw"}"#)
                .unwrap();
        assert_eq!(reset.email, "a@b.c");

        let update: UpdateUserInfoRequest =
            serde_json::from_str(r#"{"email":" a@b.c","name":"n","phone":"p"}"#).unwrap();
        assert_eq!(update.email, "a@b.c");

        let query: EmailQuery = serde_json::from_str(r#"{"email":" a@b.c "}"#).unwrap();
        assert_eq!(query.email, "a@b.c");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let req: ResetPasswordRequest = serde_json::from_str(r#"{"email":"a@b.c"}"#).unwrap();
        assert!(any_blank(&[&req.email, &req.code, &req.new_password]));
    }
}

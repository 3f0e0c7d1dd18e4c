use axum::{
    extract::Query,
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Redirect},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::config;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::middleware::session::{resolve_session, SESSION_COOKIE};
use crate::services::auth_service::{AuthService, SessionUser};

#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 2, message = "Username must be at least 2 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailQuery {
    pub token: String,
    #[serde(rename = "callbackURL")]
    pub callback_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    pub token: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// POST /api/auth/sign-up - create an unverified account and send the
/// verification email. Validation runs before any database work.
pub async fn sign_up(Json(payload): Json<SignUpRequest>) -> ApiResult<Value> {
    payload.validate()?;

    let service = AuthService::for_default_pool().await?;
    service
        .sign_up(&payload.email, &payload.username, &payload.password)
        .await?;

    Ok(ApiResponse::created(json!({
        "message": "Please check your email to verify your account."
    })))
}

/// POST /api/auth/sign-in - verify credentials and set the session cookie
pub async fn sign_in(Json(payload): Json<SignInRequest>) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let service = AuthService::for_default_pool().await?;
    let (user, token) = service.sign_in(&payload.email, &payload.password).await?;

    Ok((
        [(SET_COOKIE, session_cookie(&token, None))],
        ApiResponse::success(json!({ "user": user })),
    ))
}

/// POST /api/auth/sign-out - clear the session cookie
pub async fn sign_out() -> impl IntoResponse {
    (
        [(SET_COOKIE, session_cookie("", Some(0)))],
        ApiResponse::success(json!({ "message": "Signed out" })),
    )
}

/// GET /api/auth/get-session - resolve the current session, if any
pub async fn get_session(headers: HeaderMap) -> ApiResult<Value> {
    let claims = resolve_session(&headers)
        .ok_or_else(|| ApiError::unauthorized("Not signed in"))?;

    Ok(ApiResponse::success(json!({
        "user": SessionUser::from(&claims)
    })))
}

/// GET /api/auth/verify-email?token=...&callbackURL=... - consume the
/// verification token, then land the user on the verified page.
pub async fn verify_email(
    Query(query): Query<VerifyEmailQuery>,
) -> Result<Redirect, ApiError> {
    let service = AuthService::for_default_pool().await?;
    service.verify_email(&query.token).await?;

    // Only same-site callback paths; anything else falls back to the default
    let default = &config::config().auth.email_verification_callback;
    let target = match query.callback_url.as_deref() {
        Some(path) if path.starts_with('/') => path,
        _ => default.as_str(),
    };

    Ok(Redirect::to(target))
}

/// POST /api/auth/forgot-password - send a reset link. The response does not
/// reveal whether the address exists.
pub async fn forgot_password(Json(payload): Json<ForgotPasswordRequest>) -> ApiResult<Value> {
    payload.validate()?;

    let service = AuthService::for_default_pool().await?;
    service.forgot_password(&payload.email).await?;

    Ok(ApiResponse::success(json!({
        "message": "If the address is registered, a reset link is on its way."
    })))
}

/// POST /api/auth/reset-password - consume a reset token and set the new password
pub async fn reset_password(Json(payload): Json<ResetPasswordRequest>) -> ApiResult<Value> {
    payload.validate()?;

    let service = AuthService::for_default_pool().await?;
    service
        .reset_password(&payload.token, &payload.password)
        .await?;

    Ok(ApiResponse::success(json!({
        "message": "Password updated. You can sign in now."
    })))
}

pub(crate) fn session_cookie(token: &str, max_age: Option<u64>) -> String {
    let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, token);
    if let Some(max_age) = max_age {
        cookie.push_str(&format!("; Max-Age={}", max_age));
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_password_fails_validation_locally() {
        let request = SignUpRequest {
            email: "asha@example.com".to_string(),
            username: "asha".to_string(),
            password: "1234567".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn short_username_fails_validation_locally() {
        let request = SignUpRequest {
            email: "asha@example.com".to_string(),
            username: "a".to_string(),
            password: "long-enough-pw".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn malformed_email_fails_validation_locally() {
        let request = SignInRequest {
            email: "not-an-email".to_string(),
            password: "long-enough-pw".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn clearing_cookie_sets_zero_max_age() {
        let cookie = session_cookie("", Some(0));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.starts_with("session_token=;"));
    }
}

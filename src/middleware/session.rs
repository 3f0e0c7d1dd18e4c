use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use uuid::Uuid;

use crate::auth::{self, Claims, TokenPurpose};
use crate::error::ApiError;

pub const SESSION_COOKIE: &str = "session_token";

/// Routes reachable only *without* a session; a signed-in user is bounced home
const AUTH_ROUTES: &[&str] = &["/sign-in", "/sign-up"];
const PASSWORD_ROUTES: &[&str] = &["/forgot-password", "/reset-password"];

/// Reachable either way: the landing page of the verification link
const OPEN_ROUTES: &[&str] = &["/email-verified"];

/// Authenticated session context extracted from the session token
#[derive(Clone, Debug)]
pub struct CurrentSession {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<Claims> for CurrentSession {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            name: claims.name,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Session guard for navigable page routes.
///
/// | session | auth/password route | action              |
/// |---------|---------------------|---------------------|
/// | no      | yes                 | allow               |
/// | no      | no                  | redirect /sign-in   |
/// | yes     | yes                 | redirect /          |
/// | yes     | no                  | allow               |
///
/// Static assets and the `/api` surface are mounted outside this guard.
pub async fn session_guard(mut request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let is_auth_route = AUTH_ROUTES.contains(&path) || PASSWORD_ROUTES.contains(&path);
    let is_open_route = OPEN_ROUTES.contains(&path);

    let session = resolve_session(request.headers());

    match session {
        None if is_auth_route || is_open_route => next.run(request).await,
        None => Redirect::to("/sign-in").into_response(),
        Some(_) if is_auth_route => Redirect::to("/").into_response(),
        Some(claims) => {
            request.extensions_mut().insert(CurrentSession::from(claims));
            next.run(request).await
        }
    }
}

/// Session requirement for the JSON API: 401 instead of a redirect.
pub async fn require_session(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = resolve_session(&headers)
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    request.extensions_mut().insert(CurrentSession::from(claims));
    Ok(next.run(request).await)
}

/// Resolve the session from the request: the `session_token` cookie for
/// browsers, a Bearer token for API clients. Invalid or expired tokens are
/// treated the same as no token.
pub fn resolve_session(headers: &HeaderMap) -> Option<Claims> {
    let token = session_cookie(headers).or_else(|| bearer_token(headers))?;
    auth::verify_token(&token, TokenPurpose::Session).ok()
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;

    cookie_header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(SESSION_COOKIE).and_then(|rest| rest.strip_prefix('=')))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn cookie_is_found_among_others() {
        let headers = headers_with_cookie("theme=dark; session_token=abc.def.ghi; lang=en");
        assert_eq!(session_cookie(&headers), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn empty_cookie_value_is_no_session() {
        let headers = headers_with_cookie("session_token=");
        assert_eq!(session_cookie(&headers), None);
    }

    #[test]
    fn cookie_name_must_match_exactly() {
        let headers = headers_with_cookie("old_session_token=abc");
        assert_eq!(session_cookie(&headers), None);
    }

    #[test]
    fn bearer_token_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer tok"));
        assert_eq!(bearer_token(&headers), Some("tok".to_string()));
    }

    #[test]
    fn garbage_token_resolves_to_no_session() {
        let headers = headers_with_cookie("session_token=not-a-jwt");
        assert!(resolve_session(&headers).is_none());
    }
}

use askama::Template;
use axum::{
    extract::{Form, Query},
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use validator::Validate;

use crate::error::ApiError;
use crate::handlers::api::auth::session_cookie;
use crate::services::auth_service::AuthService;

use super::html;

#[derive(Template)]
#[template(path = "sign_in.html")]
pub struct SignInTemplate {
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "sign_up.html")]
pub struct SignUpTemplate {
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "email_verified.html")]
pub struct EmailVerifiedTemplate;

#[derive(Template)]
#[template(path = "forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "reset_password.html")]
pub struct ResetPasswordTemplate {
    pub token: String,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignInForm {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignUpForm {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 2, message = "Username must be at least 2 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordForm {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordQuery {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordForm {
    pub token: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|violations| violations.iter())
        .find_map(|violation| violation.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Please check your input.".to_string())
}

pub async fn sign_in_page() -> Response {
    html(SignInTemplate { error: None })
}

/// Form variant of sign-in: set the cookie and land on the dashboard, or
/// re-render the page with the failure message.
pub async fn sign_in_submit(Form(form): Form<SignInForm>) -> Response {
    if let Err(errors) = form.validate() {
        return html(SignInTemplate {
            error: Some(first_validation_message(&errors)),
        });
    }

    let result = match AuthService::for_default_pool().await {
        Ok(service) => service.sign_in(&form.email, &form.password).await,
        Err(db_err) => Err(db_err.into()),
    };

    match result {
        Ok((_user, token)) => (
            [(SET_COOKIE, session_cookie(&token, None))],
            Redirect::to("/dashboard"),
        )
            .into_response(),
        Err(auth_err) => html(SignInTemplate {
            error: Some(ApiError::from(auth_err).message().to_string()),
        }),
    }
}

pub async fn sign_up_page() -> Response {
    html(SignUpTemplate {
        error: None,
        notice: None,
    })
}

pub async fn sign_up_submit(Form(form): Form<SignUpForm>) -> Response {
    if let Err(errors) = form.validate() {
        return html(SignUpTemplate {
            error: Some(first_validation_message(&errors)),
            notice: None,
        });
    }

    let result = match AuthService::for_default_pool().await {
        Ok(service) => {
            service
                .sign_up(&form.email, &form.username, &form.password)
                .await
        }
        Err(db_err) => Err(db_err.into()),
    };

    match result {
        // Verification-gated: no auto-login, just the instruction
        Ok(()) => html(SignUpTemplate {
            error: None,
            notice: Some(
                "Account created. Please check your email to verify your account.".to_string(),
            ),
        }),
        Err(auth_err) => html(SignUpTemplate {
            error: Some(ApiError::from(auth_err).message().to_string()),
            notice: None,
        }),
    }
}

pub async fn email_verified_page() -> Response {
    html(EmailVerifiedTemplate)
}

pub async fn forgot_password_page() -> Response {
    html(ForgotPasswordTemplate {
        error: None,
        notice: None,
    })
}

pub async fn forgot_password_submit(Form(form): Form<ForgotPasswordForm>) -> Response {
    if let Err(errors) = form.validate() {
        return html(ForgotPasswordTemplate {
            error: Some(first_validation_message(&errors)),
            notice: None,
        });
    }

    let result = match AuthService::for_default_pool().await {
        Ok(service) => service.forgot_password(&form.email).await,
        Err(db_err) => Err(db_err.into()),
    };

    match result {
        Ok(()) => html(ForgotPasswordTemplate {
            error: None,
            notice: Some("If the address is registered, a reset link is on its way.".to_string()),
        }),
        Err(auth_err) => html(ForgotPasswordTemplate {
            error: Some(ApiError::from(auth_err).message().to_string()),
            notice: None,
        }),
    }
}

pub async fn reset_password_page(Query(query): Query<ResetPasswordQuery>) -> Response {
    html(ResetPasswordTemplate {
        token: query.token.unwrap_or_default(),
        error: None,
    })
}

pub async fn reset_password_submit(Form(form): Form<ResetPasswordForm>) -> Response {
    if let Err(errors) = form.validate() {
        return html(ResetPasswordTemplate {
            token: form.token,
            error: Some(first_validation_message(&errors)),
        });
    }

    let result = match AuthService::for_default_pool().await {
        Ok(service) => service.reset_password(&form.token, &form.password).await,
        Err(db_err) => Err(db_err.into()),
    };

    match result {
        Ok(()) => Redirect::to("/sign-in").into_response(),
        Err(auth_err) => html(ResetPasswordTemplate {
            token: form.token,
            error: Some(ApiError::from(auth_err).message().to_string()),
        }),
    }
}

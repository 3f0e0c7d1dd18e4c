use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::auth::{self, Claims, TokenError, TokenPurpose};
use crate::config;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::User;
use crate::services::email::{EmailError, Mailer};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email address not verified")]
    EmailNotVerified,

    #[error("Email address already registered")]
    EmailTaken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token generation failed: {0}")]
    TokenGeneration(String),

    #[error(transparent)]
    Email(#[from] EmailError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => AuthError::InvalidToken,
            other => AuthError::TokenGeneration(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Database(DatabaseError::Sqlx(err))
    }
}

/// Session payload exposed to clients: `{ user: { name, email, role } }`
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<&Claims> for SessionUser {
    fn from(claims: &Claims) -> Self {
        Self {
            name: claims.name.clone(),
            email: claims.email.clone(),
            role: claims.role.clone(),
        }
    }
}

/// Credential and session management over the users table. Sessions are
/// stateless signed tokens; nothing here persists beyond the user row.
pub struct AuthService {
    pool: PgPool,
    mailer: Mailer,
}

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            mailer: Mailer::new(),
        }
    }

    pub async fn for_default_pool() -> Result<Self, DatabaseError> {
        Ok(Self::new(DatabaseManager::pool().await?))
    }

    /// Create an unverified account and send the verification email. No
    /// auto-login: sign-in stays gated on verification.
    pub async fn sign_up(&self, email: &str, name: &str, password: &str) -> Result<(), AuthError> {
        let email = email.trim().to_lowercase();
        let password_hash = auth::hash_password(password);

        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(&email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await;

        let user = match result {
            Ok(user) => user,
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                return Err(AuthError::EmailTaken);
            }
            Err(other) => return Err(other.into()),
        };

        self.send_verification_email(&user).await?;
        info!("Registered user {}", user.id);
        Ok(())
    }

    /// Verify credentials and mint a session token. Unknown email and wrong
    /// password are indistinguishable to the caller.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(SessionUser, String), AuthError> {
        let email = email.trim().to_lowercase();

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !auth::verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.email_verified {
            return Err(AuthError::EmailNotVerified);
        }

        let claims = Claims::new(user.id, &user.name, &user.email, &user.role, TokenPurpose::Session);
        let token = auth::generate_token(&claims)?;

        Ok((SessionUser::from(&claims), token))
    }

    /// Consume an email-verification token and mark the account verified.
    pub async fn verify_email(&self, token: &str) -> Result<(), AuthError> {
        let claims = auth::verify_token(token, TokenPurpose::EmailVerification)?;

        let updated = sqlx::query("UPDATE users SET email_verified = true, updated_at = now() WHERE id = $1")
            .bind(claims.user_id)
            .execute(&self.pool)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(AuthError::InvalidToken);
        }

        info!("Verified email for user {}", claims.user_id);
        Ok(())
    }

    /// Send a password-reset link. Succeeds silently for unknown addresses so
    /// the endpoint cannot be used to enumerate accounts.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        let email = email.trim().to_lowercase();

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;

        let Some(user) = user else {
            return Ok(());
        };

        let claims = Claims::new(
            user.id,
            &user.name,
            &user.email,
            &user.role,
            TokenPurpose::PasswordReset,
        );
        let token = auth::generate_token(&claims)?;
        let reset_url = format!(
            "{}/reset-password?token={}",
            config::config().auth.base_url,
            token
        );

        self.mailer
            .send(&user.email, "Reset your password", &reset_url)
            .await?;
        Ok(())
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        let claims = auth::verify_token(token, TokenPurpose::PasswordReset)?;
        let password_hash = auth::hash_password(new_password);

        let updated = sqlx::query("UPDATE users SET password_hash = $1, updated_at = now() WHERE id = $2")
            .bind(&password_hash)
            .bind(claims.user_id)
            .execute(&self.pool)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(AuthError::InvalidToken);
        }

        info!("Reset password for user {}", claims.user_id);
        Ok(())
    }

    async fn send_verification_email(&self, user: &User) -> Result<(), AuthError> {
        let claims = Claims::new(
            user.id,
            &user.name,
            &user.email,
            &user.role,
            TokenPurpose::EmailVerification,
        );
        let token = auth::generate_token(&claims)?;

        let auth_config = &config::config().auth;
        let verification_url = format!(
            "{}/api/auth/verify-email?token={}&callbackURL={}",
            auth_config.base_url, token, auth_config.email_verification_callback
        );

        self.mailer
            .send(&user.email, "Verify your email", &verification_url)
            .await?;
        Ok(())
    }
}

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config;

/// What a signed token may be used for. Session cookies, email-verification
/// links and password-reset links all share the signing machinery but must
/// never be interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Session,
    EmailVerification,
    PasswordReset,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub purpose: TokenPurpose,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(
        user_id: Uuid,
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
        purpose: TokenPurpose,
    ) -> Self {
        let now = Utc::now();
        let expiry_hours = match purpose {
            TokenPurpose::Session => config::config().auth.session_expiry_hours,
            TokenPurpose::EmailVerification | TokenPurpose::PasswordReset => {
                config::config().auth.verification_expiry_hours
            }
        };
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            user_id,
            name: name.into(),
            email: email.into(),
            role: role.into(),
            purpose,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum TokenError {
    Generation(String),
    Invalid,
    MissingSecret,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Generation(msg) => write!(f, "token generation error: {}", msg),
            TokenError::Invalid => write!(f, "invalid or expired token"),
            TokenError::MissingSecret => write!(f, "session secret not configured"),
        }
    }
}

impl std::error::Error for TokenError {}

pub fn generate_token(claims: &Claims) -> Result<String, TokenError> {
    let secret = &config::config().auth.session_secret;

    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| TokenError::Generation(e.to_string()))
}

/// Validate signature and expiry, then check the token was minted for the
/// expected purpose.
pub fn verify_token(token: &str, expected: TokenPurpose) -> Result<Claims, TokenError> {
    let secret = &config::config().auth.session_secret;

    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|_| TokenError::Invalid)?;

    if token_data.claims.purpose != expected {
        return Err(TokenError::Invalid);
    }

    Ok(token_data.claims)
}

/// Salted SHA-256 digest, stored as `salt$hexdigest`.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, digest(&salt, password))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => digest(salt, password) == expected,
        None => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b"$");
    hasher.update(password.as_bytes());
    let hash = hasher.finalize();
    format!("{:x}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let claims = Claims::new(
            Uuid::new_v4(),
            "Asha",
            "asha@example.com",
            "CUSTOMER",
            TokenPurpose::Session,
        );
        let token = generate_token(&claims).unwrap();
        let decoded = verify_token(&token, TokenPurpose::Session).unwrap();
        assert_eq!(decoded.user_id, claims.user_id);
        assert_eq!(decoded.email, "asha@example.com");
    }

    #[test]
    fn purpose_mismatch_is_rejected() {
        let claims = Claims::new(
            Uuid::new_v4(),
            "Asha",
            "asha@example.com",
            "CUSTOMER",
            TokenPurpose::EmailVerification,
        );
        let token = generate_token(&claims).unwrap();
        assert!(verify_token(&token, TokenPurpose::Session).is_err());
        assert!(verify_token(&token, TokenPurpose::EmailVerification).is_ok());
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut claims = Claims::new(
            Uuid::new_v4(),
            "Asha",
            "asha@example.com",
            "CUSTOMER",
            TokenPurpose::Session,
        );
        claims.exp = (Utc::now() - Duration::hours(2)).timestamp();
        let token = generate_token(&claims).unwrap();
        assert!(verify_token(&token, TokenPurpose::Session).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(verify_token("not-a-token", TokenPurpose::Session).is_err());
    }

    #[test]
    fn password_digest_verifies() {
        let stored = hash_password("hunter2hunter2");
        assert!(verify_password("hunter2hunter2", &stored));
        assert!(!verify_password("hunter2hunter3", &stored));
        assert!(!verify_password("hunter2hunter2", "malformed"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        assert_ne!(hash_password("pw-pw-pw-pw"), hash_password("pw-pw-pw-pw"));
    }
}

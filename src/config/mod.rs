use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub http: HttpConfig,
    pub auth: AuthConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for session and verification tokens
    pub session_secret: String,
    pub session_expiry_hours: u64,
    /// Shorter window for email-verification and password-reset tokens
    pub verification_expiry_hours: u64,
    /// External base URL used when building links in outbound email
    pub base_url: String,
    /// Where the email-verification endpoint lands the user afterwards
    pub email_verification_callback: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub api_base_url: String,
    pub from_address: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment presets first, specific env vars win
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        if let Ok(v) = env::var("HTTP_PORT").or_else(|_| env::var("PORT")) {
            self.http.port = v.parse().unwrap_or(self.http.port);
        }
        if let Ok(v) = env::var("HTTP_CORS_ORIGINS") {
            self.http.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        if let Ok(v) = env::var("SESSION_SECRET") {
            self.auth.session_secret = v;
        }
        if let Ok(v) = env::var("SESSION_EXPIRY_HOURS") {
            self.auth.session_expiry_hours = v.parse().unwrap_or(self.auth.session_expiry_hours);
        }
        if let Ok(v) = env::var("VERIFICATION_EXPIRY_HOURS") {
            self.auth.verification_expiry_hours =
                v.parse().unwrap_or(self.auth.verification_expiry_hours);
        }
        if let Ok(v) = env::var("AUTH_BASE_URL") {
            self.auth.base_url = v;
        }
        if let Ok(v) = env::var("EMAIL_VERIFICATION_CALLBACK_URL") {
            self.auth.email_verification_callback = v;
        }

        if let Ok(v) = env::var("EMAIL_API_BASE_URL") {
            self.email.api_base_url = v;
        }
        if let Ok(v) = env::var("EMAIL_FROM_ADDRESS") {
            self.email.from_address = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
            },
            http: HttpConfig {
                port: 3000,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
            auth: AuthConfig {
                // Overridden by SESSION_SECRET in any real deployment
                session_secret: "estate-dev-secret".to_string(),
                session_expiry_hours: 24 * 7,
                verification_expiry_hours: 24,
                base_url: "http://localhost:3000".to_string(),
                email_verification_callback: "/email-verified".to_string(),
            },
            email: EmailConfig {
                api_base_url: "https://api.resend.com".to_string(),
                from_address: "Estate <onboarding@resend.dev>".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
            },
            http: HttpConfig {
                port: 3000,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            auth: AuthConfig {
                session_secret: String::new(),
                session_expiry_hours: 24,
                verification_expiry_hours: 24,
                base_url: "https://staging.example.com".to_string(),
                email_verification_callback: "/email-verified".to_string(),
            },
            email: EmailConfig {
                api_base_url: "https://api.resend.com".to_string(),
                from_address: "Estate <onboarding@resend.dev>".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
            },
            http: HttpConfig {
                port: 3000,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            auth: AuthConfig {
                // Must come from SESSION_SECRET; an empty secret fails closed at token use
                session_secret: String::new(),
                session_expiry_hours: 24,
                verification_expiry_hours: 4,
                base_url: "https://app.example.com".to_string(),
                email_verification_callback: "/email-verified".to_string(),
            },
            email: EmailConfig {
                api_base_url: "https://api.resend.com".to_string(),
                from_address: "Estate <onboarding@resend.dev>".to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let config = AppConfig::development();
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.auth.session_expiry_hours, 24 * 7);
        assert!(!config.auth.session_secret.is_empty());
    }

    #[test]
    fn production_requires_secret_from_env() {
        let config = AppConfig::production();
        assert!(config.auth.session_secret.is_empty());
        assert_eq!(config.auth.verification_expiry_hours, 4);
    }
}

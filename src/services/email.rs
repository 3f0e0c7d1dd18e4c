use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("RESEND_API_KEY is not defined")]
    MissingApiKey,

    #[error("Email request failed: {0}")]
    Request(String),

    #[error("Email provider rejected the message: {0}")]
    Provider(String),
}

#[derive(Debug, Serialize)]
struct OutboundEmail<'a> {
    from: &'a str,
    to: Vec<String>,
    subject: String,
    text: String,
}

/// Outbound transactional email through the Resend HTTP API. Only
/// verification and password-reset mail pass through here; failures never
/// take the process down, they surface per-request.
pub struct Mailer {
    client: reqwest::Client,
}

impl Mailer {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub async fn send(&self, to: &str, subject: &str, text: &str) -> Result<(), EmailError> {
        // Read at call time so a key rotated in the environment is picked up
        // without a restart
        let api_key = std::env::var("RESEND_API_KEY").map_err(|_| EmailError::MissingApiKey)?;

        let email_config = &config::config().email;
        let payload = OutboundEmail {
            from: &email_config.from_address,
            to: vec![to.trim().to_lowercase()],
            subject: subject.trim().to_string(),
            text: text.trim().to_string(),
        };

        let response = self
            .client
            .post(format!("{}/emails", email_config.api_base_url))
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| EmailError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body: Value = response.json().await.unwrap_or(Value::Null);
            return Err(EmailError::Provider(format!("{}: {}", status, body)));
        }

        Ok(())
    }
}

impl Default for Mailer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_is_normalized() {
        let payload = OutboundEmail {
            from: "Estate <onboarding@resend.dev>",
            to: vec![" Asha@Example.COM ".trim().to_lowercase()],
            subject: "Verify your email".to_string(),
            text: "https://example.com/verify".to_string(),
        };
        assert_eq!(payload.to, vec!["asha@example.com".to_string()]);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["from"], "Estate <onboarding@resend.dev>");
        assert!(json["to"].is_array());
    }
}

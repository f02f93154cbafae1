//! Mailer backed by an HTTP mail provider API.

use async_trait::async_trait;
use serde::Serialize;

use daybook_core::ports::{MailMessage, Mailer, NotifyError};

/// HTTP mail provider configuration.
#[derive(Debug, Clone)]
pub struct HttpMailerConfig {
    /// Endpoint accepting a JSON message, e.g. `https://api.mail.example/v1/send`.
    pub api_url: String,
    pub api_key: String,
    pub from: String,
}

impl HttpMailerConfig {
    /// Reads `MAIL_API_URL`, `MAIL_API_KEY` and `MAIL_FROM`.
    /// Returns `None` unless both the URL and key are set.
    pub fn from_env() -> Option<Self> {
        let api_url = std::env::var("MAIL_API_URL").ok()?;
        let api_key = std::env::var("MAIL_API_KEY").ok()?;
        Some(Self {
            api_url,
            api_key,
            from: std::env::var("MAIL_FROM").unwrap_or_else(|_| "no-reply@daybook.local".to_string()),
        })
    }
}

#[derive(Serialize)]
struct Payload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

pub struct HttpMailer {
    config: HttpMailerConfig,
    client: reqwest::Client,
}

impl HttpMailer {
    pub fn new(config: HttpMailerConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: MailMessage) -> Result<(), NotifyError> {
        let payload = Payload {
            from: &self.config.from,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "Mail provider rejected message");
            return Err(NotifyError::Rejected(format!("{status}: {detail}")));
        }

        tracing::debug!(subject = %message.subject, "Mail delivered");
        Ok(())
    }
}

//! Outgoing mail port.

use async_trait::async_trait;

/// A plain-text message for a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    /// Password reset message pointing at `reset_base_url/<token>`.
    pub fn password_reset(to: impl Into<String>, reset_base_url: &str, token: &str) -> Self {
        let link = format!("{}/{}", reset_base_url.trim_end_matches('/'), token);
        Self {
            to: to.into(),
            subject: "Password Reset".to_string(),
            body: format!("Click the following link to reset your password: {link}"),
        }
    }
}

/// Mail delivery collaborator.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: MailMessage) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Mail delivery failed: {0}")]
    Delivery(String),

    #[error("Mail provider rejected the message: {0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_message_embeds_link() {
        let msg = MailMessage::password_reset("a@b.io", "http://localhost:4200/reset-password/", "tok");
        assert_eq!(msg.to, "a@b.io");
        assert_eq!(msg.subject, "Password Reset");
        assert_eq!(
            msg.body,
            "Click the following link to reset your password: http://localhost:4200/reset-password/tok"
        );
    }
}

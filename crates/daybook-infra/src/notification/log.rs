//! Mailer that writes messages to the log - used in development.

use async_trait::async_trait;

use daybook_core::ports::{MailMessage, Mailer, NotifyError};

use crate::pii::mask_email;

/// Logs outgoing mail instead of delivering it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: MailMessage) -> Result<(), NotifyError> {
        tracing::info!(
            to = %mask_email(&message.to),
            subject = %message.subject,
            body = %message.body,
            "Mail not delivered (log mailer)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        let message = MailMessage::password_reset("a@b.io", "http://localhost/reset", "t");
        assert!(LogMailer.send(message).await.is_ok());
    }
}

/**
 * Outgoing Mail
 *
 * Password reset codes are the only mail the server sends. Delivery is
 * pluggable so tests and local runs need no SMTP relay:
 *
 * - `Smtp` - `lettre` async SMTP transport, used when `[smtp]` is configured
 * - `Log` - logs the recipient only
 * - `Memory` - keeps an outbox in memory
 */

use std::sync::Arc;

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message as Email, Tokio1Executor};
use tokio::sync::Mutex;

use crate::backend::error::BackendError;
use crate::shared::SmtpConfig;

const RESET_SUBJECT: &str = "Your Beans password reset code";

/// A mail handed to the mailer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Clone)]
pub enum Mailer {
    Smtp {
        transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
        from: Mailbox,
    },
    Log,
    Memory(Arc<Mutex<Vec<OutgoingMail>>>),
}

impl std::fmt::Debug for Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Smtp { from, .. } => write!(f, "Mailer::Smtp({})", from),
            Self::Log => write!(f, "Mailer::Log"),
            Self::Memory(_) => write!(f, "Mailer::Memory"),
        }
    }
}

impl Mailer {
    /// SMTP when configured, otherwise log-only
    pub fn from_config(smtp: Option<&SmtpConfig>) -> Result<Self, BackendError> {
        let Some(smtp) = smtp else {
            tracing::info!("SMTP not configured. Reset codes will not be mailed.");
            return Ok(Self::Log);
        };

        let from: Mailbox = smtp.from.parse().map_err(|e| {
            BackendError::state(format!("Invalid SMTP sender '{}': {}", smtp.from, e))
        })?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
            .map_err(|e| BackendError::state(format!("Invalid SMTP relay '{}': {}", smtp.host, e)))?
            .credentials(Credentials::new(
                smtp.username.clone(),
                smtp.password.clone(),
            ))
            .build();

        tracing::info!("Mailing reset codes through {}", smtp.host);
        Ok(Self::Smtp {
            transport: Arc::new(transport),
            from,
        })
    }

    pub fn memory() -> Self {
        Self::Memory(Arc::new(Mutex::new(Vec::new())))
    }

    /// Mails held by a `Memory` mailer, oldest first
    pub async fn sent(&self) -> Vec<OutgoingMail> {
        match self {
            Self::Memory(outbox) => outbox.lock().await.clone(),
            _ => Vec::new(),
        }
    }

    pub async fn send_reset_code(&self, to: &str, code: &str) -> Result<(), BackendError> {
        let mail = OutgoingMail {
            to: to.to_string(),
            subject: RESET_SUBJECT.to_string(),
            body: format!(
                "Use this code to reset your Beans password:\n\n{}\n\nThe code can be used once.",
                code
            ),
        };
        self.send(mail).await
    }

    async fn send(&self, mail: OutgoingMail) -> Result<(), BackendError> {
        match self {
            Self::Smtp { transport, from } => {
                let to: Mailbox = mail.to.parse().map_err(|e| {
                    BackendError::input(format!("Invalid recipient '{}': {}", mail.to, e))
                })?;
                let email = Email::builder()
                    .from(from.clone())
                    .to(to)
                    .subject(mail.subject)
                    .body(mail.body)
                    .map_err(|e| BackendError::state(format!("Failed to build mail: {}", e)))?;
                transport.send(email).await.map_err(|e| {
                    tracing::error!("SMTP delivery to {} failed: {}", mail.to, e);
                    BackendError::state(format!("Mail delivery failed: {}", e))
                })?;
                tracing::info!("Mailed reset code to {}", mail.to);
            }
            Self::Log => {
                tracing::info!("Reset code issued for {} (mail delivery disabled)", mail.to);
            }
            Self::Memory(outbox) => {
                outbox.lock().await.push(mail);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_mailer_keeps_reset_code() {
        let mailer = Mailer::memory();
        mailer.send_reset_code("a@example.com", "abc123").await.unwrap();

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@example.com");
        assert!(sent[0].body.contains("abc123"));
    }

    #[tokio::test]
    async fn test_log_mailer_sends_nothing_visible() {
        let mailer = Mailer::from_config(None).unwrap();
        mailer.send_reset_code("a@example.com", "abc123").await.unwrap();
        assert!(mailer.sent().await.is_empty());
    }

    #[test]
    fn test_invalid_sender_is_rejected() {
        let smtp = SmtpConfig {
            host: "smtp.example.com".to_string(),
            username: "u".to_string(),
            password: "p".to_string(),
            from: "not a mailbox".to_string(),
        };
        assert!(Mailer::from_config(Some(&smtp)).is_err());
    }
}

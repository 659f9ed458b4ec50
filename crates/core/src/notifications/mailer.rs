use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

use super::templates::EmailTemplate;

/// A fully rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl OutboundEmail {
    pub fn new(from: impl Into<String>, to: impl Into<String>, template: EmailTemplate) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: template.subject,
            html: template.html,
            text: template.text,
        }
    }
}

/// Outbound email collaborator.
///
/// Only delivery lives behind this trait; deciding what to send and
/// rendering it happen before `send` is called.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Human-readable name of this mailer (for logs/errors).
    fn name(&self) -> &str;

    /// Deliver one email. Returns the provider's message id.
    async fn send(&self, email: &OutboundEmail) -> Result<String, CoreError>;
}

/// Mailer that only logs. Useful for local runs without an email provider.
#[derive(Debug, Default)]
pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<String, CoreError> {
        if email.to.trim().is_empty() {
            return Err(CoreError::Email("recipient address is empty".into()));
        }
        let message_id = Uuid::new_v4().to_string();
        tracing::info!(
            to = %email.to,
            from = %email.from,
            subject = %email.subject,
            %message_id,
            "email delivered to log"
        );
        Ok(message_id)
    }
}

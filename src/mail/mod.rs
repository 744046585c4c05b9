pub mod mailerlite;

pub use mailerlite::{DeliveryOutcome, MailerLiteClient};

use std::time::Duration;

use serde_json::Value;

use crate::config::Config;

/// Mailer abstraction (currently backed by MailerLite)
#[derive(Clone)]
pub struct Mailer {
    inner: MailerLiteClient,
}

impl Mailer {
    /// Create mailer from an explicit config (endpoint, credential, timeout)
    pub fn new(config: &Config) -> Self {
        Self {
            inner: MailerLiteClient::new(config),
        }
    }

    /// Send one email. Never fails; transport problems come back as
    /// synthetic status codes in the outcome.
    #[allow(clippy::too_many_arguments)]
    pub async fn send_email(
        &self,
        from_email: &str,
        from_name: &str,
        to_email: &str,
        to_name: &str,
        subject: &str,
        html: &str,
        text: Option<&str>,
        timeout: Option<Duration>,
    ) -> DeliveryOutcome {
        self.inner
            .send_email(
                from_email, from_name, to_email, to_name, subject, html, text, timeout,
            )
            .await
    }

    /// Legacy entry point taking a pre-built payload document
    pub async fn send_payload(&self, payload: &Value, timeout: Option<Duration>) -> DeliveryOutcome {
        self.inner.send_payload(payload, timeout).await
    }
}

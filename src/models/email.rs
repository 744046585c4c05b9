use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Lifecycle of a logged send attempt. Every entry starts `pending` and
/// transitions exactly once to `sent` or `failed`; there are no retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum EmailStatus {
    Pending,
    Sent,
    Failed,
}

/// One row of the email log, as stored
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EmailLog {
    pub id: i64,
    pub sender_email: String,
    pub receiver_email: String,
    pub subject: String,
    pub status: EmailStatus,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

/// Request to queue an email for delivery
#[derive(Debug, Clone, Deserialize)]
pub struct SendEmailRequest {
    pub sender_email: String,
    pub sender_name: String,
    pub receiver_email: String,
    pub receiver_name: String,
    pub subject: String,
    /// HTML body, sent verbatim when template rendering is disabled
    pub content: String,
    /// Variables for the welcome template; documented defaults apply per key
    #[serde(default)]
    pub template_data: Option<serde_json::Value>,
}

impl SendEmailRequest {
    /// Reject malformed addresses before any log row is created.
    pub fn validate(&self) -> Result<(), AppError> {
        if !is_valid_email(&self.sender_email) {
            return Err(AppError::Validation(format!(
                "sender_email: '{}' is not a well-formed email address",
                self.sender_email
            )));
        }
        if !is_valid_email(&self.receiver_email) {
            return Err(AppError::Validation(format!(
                "receiver_email: '{}' is not a well-formed email address",
                self.receiver_email
            )));
        }
        Ok(())
    }
}

/// Acknowledgment returned by POST /send-email
#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub status: String,
    pub email_id: i64,
    pub message: String,
}

/// Query parameters for GET /api/status
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    pub status: Option<EmailStatus>,
}

fn default_page() -> u32 {
    1
}

/// One item of the paginated status listing
#[derive(Debug, Serialize)]
pub struct EmailStatusEntry {
    pub id: i64,
    pub sender: String,
    pub receiver: String,
    pub subject: String,
    pub status: EmailStatus,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

impl From<EmailLog> for EmailStatusEntry {
    fn from(log: EmailLog) -> Self {
        Self {
            id: log.id,
            sender: log.sender_email,
            receiver: log.receiver_email,
            subject: log.subject,
            status: log.status,
            response: log.response,
            created_at: log.created_at,
        }
    }
}

/// Paginated status listing returned by GET /api/status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
    pub data: Vec<EmailStatusEntry>,
}

/// Well-formedness check for an email address: one `@`, a non-empty local
/// part, a dotted domain, and no whitespace.
pub fn is_valid_email(addr: &str) -> bool {
    if addr.chars().any(|c| c.is_whitespace()) {
        return false;
    }
    let mut parts = addr.splitn(2, '@');
    let (local, domain) = match (parts.next(), parts.next()) {
        (Some(l), Some(d)) => (l, d),
        _ => return false,
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    true
}

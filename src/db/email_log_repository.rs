use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{EmailLog, EmailStatus, SendEmailRequest};

const SELECT_COLUMNS: &str =
    "SELECT id, sender_email, receiver_email, subject, status, response, created_at \
     FROM email_logs";

/// Repository for email log rows
#[derive(Clone)]
pub struct EmailLogRepository {
    pool: SqlitePool,
}

impl EmailLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new log row in `pending` state and return its id
    pub async fn create(&self, request: &SendEmailRequest) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO email_logs (sender_email, receiver_email, subject, status, response, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&request.sender_email)
        .bind(&request.receiver_email)
        .bind(&request.subject)
        .bind(EmailStatus::Pending)
        .bind("Email queued for sending")
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::debug!(email_id = id, "Email log entry created");
        Ok(id)
    }

    /// Get a log row by id
    pub async fn get(&self, id: i64) -> Result<Option<EmailLog>> {
        let log = sqlx::query_as::<_, EmailLog>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(log)
    }

    /// The single terminal mutation: record the delivery outcome.
    pub async fn mark_completed(
        &self,
        id: i64,
        status: EmailStatus,
        response: &str,
    ) -> Result<()> {
        sqlx::query("UPDATE email_logs SET status = ?, response = ? WHERE id = ?")
            .bind(status)
            .bind(response)
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!(email_id = id, status = ?status, "Email log entry updated");
        Ok(())
    }

    /// Paginated listing, newest first. `total` counts all rows matching the
    /// filter; a page past the end yields an empty slice, not an error.
    pub async fn list(
        &self,
        filter: Option<EmailStatus>,
        page: u32,
        per_page: u32,
    ) -> Result<(i64, Vec<EmailLog>)> {
        let offset = i64::from(page.max(1) - 1) * i64::from(per_page);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM email_logs WHERE (?1 IS NULL OR status = ?1)",
        )
        .bind(filter)
        .fetch_one(&self.pool)
        .await?;

        // id is monotonic, so the tie-break keeps creation order for rows
        // inserted within the same timestamp granule
        let logs = sqlx::query_as::<_, EmailLog>(&format!(
            "{} WHERE (?1 IS NULL OR status = ?1) \
             ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3",
            SELECT_COLUMNS
        ))
        .bind(filter)
        .bind(i64::from(per_page))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((total, logs))
    }

    /// Probe the pool with a trivial query
    pub async fn health_check(&self) -> Result<bool> {
        let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        Ok(one == 1)
    }
}

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};

use crate::error::Result;
use crate::models::{EmailStatus, SendEmailRequest, SendEmailResponse, StatusQuery, StatusResponse};
use crate::state::AppState;

const PER_PAGE: u32 = 10;

/// Email routes
pub fn email_routes() -> Router<AppState> {
    Router::new()
        .route("/send-email", post(send_email))
        .route("/api/status", get(email_status))
}

/// POST /send-email - Queue an email for background delivery.
///
/// Creates the pending log row, spawns the delivery task and returns
/// immediately; the caller never sees the final delivery outcome here.
async fn send_email(
    State(state): State<AppState>,
    Json(request): Json<SendEmailRequest>,
) -> Result<Json<SendEmailResponse>> {
    request.validate()?;

    let email_id = state.email_logs.create(&request).await?;
    tracing::info!(email_id, receiver = %request.receiver_email, "Email queued");

    // Fire and forget: no queue, no cap, no cancellation
    tokio::spawn(deliver_email(state.clone(), email_id, request));

    Ok(Json(SendEmailResponse {
        status: "queued".to_string(),
        email_id,
        message: "Email queued for sending in background".to_string(),
    }))
}

/// GET /api/status - Paginated delivery log, newest first
async fn email_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusResponse>> {
    let page = query.page.max(1);
    let (total, logs) = state.email_logs.list(query.status, page, PER_PAGE).await?;

    Ok(Json(StatusResponse {
        total,
        page,
        per_page: PER_PAGE,
        data: logs.into_iter().map(Into::into).collect(),
    }))
}

/// Background delivery task: render the body, call the delivery API and
/// record the single terminal status transition. Nothing here surfaces to an
/// HTTP client; the response was sent before this task started.
async fn deliver_email(state: AppState, email_id: i64, request: SendEmailRequest) {
    match state.email_logs.get(email_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            tracing::debug!(email_id, "Log entry missing before delivery, aborting");
            return;
        }
        Err(err) => {
            tracing::error!(email_id, error = %err, "Could not fetch log entry, abandoning delivery");
            return;
        }
    }

    let html = if state.config.render_templates {
        match state
            .templates
            .render_welcome(&request.receiver_name, request.template_data.as_ref())
        {
            Ok(html) => html,
            Err(err) => {
                record_failure(
                    &state,
                    email_id,
                    &format!("Template rendering failed: {}", err),
                )
                .await;
                return;
            }
        }
    } else {
        request.content.clone()
    };

    let outcome = state
        .mailer
        .send_email(
            &request.sender_email,
            &request.sender_name,
            &request.receiver_email,
            &request.receiver_name,
            &request.subject,
            &html,
            None,
            None,
        )
        .await;

    let status = if outcome.is_success() {
        EmailStatus::Sent
    } else {
        EmailStatus::Failed
    };

    if let Err(err) = state
        .email_logs
        .mark_completed(email_id, status, &outcome.message)
        .await
    {
        tracing::error!(email_id, error = %err, "Failed to record delivery outcome");
    }
}

async fn record_failure(state: &AppState, email_id: i64, description: &str) {
    if let Err(err) = state
        .email_logs
        .mark_completed(email_id, EmailStatus::Failed, description)
        .await
    {
        tracing::error!(email_id, error = %err, "Failed to record delivery failure");
    }
}

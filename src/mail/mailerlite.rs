use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;

/// Result of a delivery attempt. Always produced, even when the transport
/// fails: timeouts, refused connections and other client errors are folded
/// into synthetic status codes so no error ever escapes this module.
#[derive(Debug, Clone)]
pub struct DeliveryOutcome {
    pub status_code: u16,
    pub message: String,
}

impl DeliveryOutcome {
    /// The 2xx convention used by the caller to classify the log entry
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

#[derive(Serialize)]
struct Party<'a> {
    email: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
struct SendPayload<'a> {
    from: Party<'a>,
    to: [Party<'a>; 1],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

/// Client for the MailerLite send endpoint
#[derive(Clone)]
pub struct MailerLiteClient {
    client: Client,
    endpoint: String,
    api_key: String,
    default_timeout: Duration,
}

impl MailerLiteClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.mailerlite_url.clone(),
            api_key: config.mailerlite_api_key.clone(),
            default_timeout: Duration::from_secs(config.send_timeout_secs),
        }
    }

    /// POST the email to the delivery API and hand back its status code and
    /// raw body verbatim. Deciding what counts as success is the caller's job.
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
        let payload = SendPayload {
            from: Party {
                email: from_email,
                name: from_name,
            },
            to: [Party {
                email: to_email,
                name: to_name,
            }],
            subject,
            html,
            text,
        };

        let request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .timeout(timeout.unwrap_or(self.default_timeout))
            .json(&payload);

        match request.send().await {
            Ok(response) => {
                let status_code = response.status().as_u16();
                let message = response.text().await.unwrap_or_default();
                DeliveryOutcome {
                    status_code,
                    message,
                }
            }
            Err(err) if err.is_timeout() => DeliveryOutcome {
                status_code: 408,
                message: "Request timeout - email service took too long to respond".to_string(),
            },
            Err(err) if err.is_connect() => DeliveryOutcome {
                status_code: 503,
                message: "Connection error - could not reach email service".to_string(),
            },
            Err(err) => DeliveryOutcome {
                status_code: 500,
                message: format!("Email sending failed: {}", err),
            },
        }
    }

    /// Legacy entry point: destructure a pre-built payload document and
    /// delegate. Missing keys become empty values, never an error.
    pub async fn send_payload(&self, payload: &Value, timeout: Option<Duration>) -> DeliveryOutcome {
        let (from_email, from_name) = party_fields(payload.get("from"));
        let (to_email, to_name) = party_fields(payload.get("to").and_then(|to| to.get(0)));

        self.send_email(
            &from_email,
            &from_name,
            &to_email,
            &to_name,
            payload.get("subject").and_then(Value::as_str).unwrap_or(""),
            payload.get("html").and_then(Value::as_str).unwrap_or(""),
            payload.get("text").and_then(Value::as_str),
            timeout,
        )
        .await
    }
}

fn party_fields(value: Option<&Value>) -> (String, String) {
    let field = |key: &str| {
        value
            .and_then(|v| v.get(key))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string()
    };
    (field("email"), field("name"))
}

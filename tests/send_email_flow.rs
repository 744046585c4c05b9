//! End-to-end flow: submit an email, let the background task run against a
//! local mock delivery server, and observe the terminal status via the API.

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tokio::net::TcpListener;

use mailrelay_backend::api;
use mailrelay_backend::config::Config;
use mailrelay_backend::db::{self, EmailLogRepository};
use mailrelay_backend::mail::Mailer;
use mailrelay_backend::state::AppState;
use mailrelay_backend::templates::TemplateRegistry;

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn test_config(mailerlite_url: String) -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        database_url: "sqlite::memory:".to_string(),
        mailerlite_api_key: "test-key".to_string(),
        mailerlite_url,
        send_timeout_secs: 1,
        render_templates: true,
    }
}

async fn spawn_app(config: Config) -> SocketAddr {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::init_schema(&pool).await.unwrap();

    let state = AppState::new(
        config.clone(),
        EmailLogRepository::new(pool),
        Mailer::new(&config),
        TemplateRegistry::new().unwrap(),
    );
    serve(api::create_router(state)).await
}

fn submission() -> Value {
    json!({
        "sender_email": "a@x.com",
        "sender_name": "A",
        "receiver_email": "b@y.com",
        "receiver_name": "B",
        "subject": "Hi",
        "content": "<p>hi</p>"
    })
}

/// Poll the status API until the newest row leaves `pending`
async fn wait_for_terminal(client: &reqwest::Client, app: SocketAddr) -> Value {
    for _ in 0..100 {
        let body: Value = client
            .get(format!("http://{}/api/status", app))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        if body["data"][0]["status"] != "pending" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("email never reached a terminal status");
}

#[tokio::test]
async fn accepted_delivery_ends_in_sent() {
    let mock = serve(Router::new().route(
        "/api/email/send",
        post(|| async { (StatusCode::ACCEPTED, "accepted") }),
    ))
    .await;
    let app = spawn_app(test_config(format!("http://{}/api/email/send", mock))).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{}/send-email", app))
        .json(&submission())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let ack: Value = response.json().await.unwrap();
    assert_eq!(ack["status"], "queued");
    assert_eq!(ack["email_id"], 1);

    let body = wait_for_terminal(&client, app).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["per_page"], 10);
    let row = &body["data"][0];
    assert_eq!(row["id"], 1);
    assert_eq!(row["sender"], "a@x.com");
    assert_eq!(row["receiver"], "b@y.com");
    assert_eq!(row["subject"], "Hi");
    assert_eq!(row["status"], "sent");
    assert_eq!(row["response"], "accepted");
}

#[tokio::test]
async fn delivery_timeout_ends_in_failed() {
    let mock = serve(Router::new().route(
        "/api/email/send",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            StatusCode::OK
        }),
    ))
    .await;
    let app = spawn_app(test_config(format!("http://{}/api/email/send", mock))).await;
    let client = reqwest::Client::new();

    client
        .post(format!("http://{}/send-email", app))
        .json(&submission())
        .send()
        .await
        .unwrap();

    let body = wait_for_terminal(&client, app).await;
    let row = &body["data"][0];
    assert_eq!(row["status"], "failed");
    assert!(row["response"]
        .as_str()
        .unwrap()
        .to_lowercase()
        .contains("timeout"));
}

#[tokio::test]
async fn malformed_receiver_is_rejected_without_a_row() {
    let app = spawn_app(test_config("http://127.0.0.1:9/api/email/send".to_string())).await;
    let client = reqwest::Client::new();

    let mut bad = submission();
    bad["receiver_email"] = json!("not-an-email");

    let response = client
        .post(format!("http://{}/send-email", app))
        .json(&bad)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let error: Value = response.json().await.unwrap();
    assert!(error["error"].as_str().unwrap().contains("receiver_email"));

    let body: Value = client
        .get(format!("http://{}/api/status", app))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 0);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn raw_content_mode_skips_the_template() {
    // Echo the wire payload back so the recorded response shows what was sent
    let mock = serve(Router::new().route(
        "/api/email/send",
        post(|body: String| async move { (StatusCode::OK, body) }),
    ))
    .await;
    let mut config = test_config(format!("http://{}/api/email/send", mock));
    config.render_templates = false;
    let app = spawn_app(config).await;
    let client = reqwest::Client::new();

    client
        .post(format!("http://{}/send-email", app))
        .json(&submission())
        .send()
        .await
        .unwrap();

    let body = wait_for_terminal(&client, app).await;
    let row = &body["data"][0];
    assert_eq!(row["status"], "sent");

    let wire: Value = serde_json::from_str(row["response"].as_str().unwrap()).unwrap();
    assert_eq!(wire["html"], "<p>hi</p>");
    assert_eq!(wire["from"]["email"], "a@x.com");
}

#[tokio::test]
async fn health_check_reports_ok() {
    let app = spawn_app(test_config("http://127.0.0.1:9/api/email/send".to_string())).await;

    let body: Value = reqwest::get(format!("http://{}/health", app))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}

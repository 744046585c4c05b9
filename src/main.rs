use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mailrelay_backend::api;
use mailrelay_backend::config::Config;
use mailrelay_backend::db::{self, EmailLogRepository};
use mailrelay_backend::mail::Mailer;
use mailrelay_backend::state::AppState;
use mailrelay_backend::templates::TemplateRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Mailrelay Backend...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        host = %config.server_host,
        port = %config.server_port,
        render_templates = config.render_templates,
        "Configuration loaded"
    );

    // Create database pool and schema
    let pool = db::create_pool(&config).await?;
    db::init_schema(&pool).await?;
    let email_logs = EmailLogRepository::new(pool);

    // Test database connection
    match email_logs.health_check().await {
        Ok(true) => tracing::info!("Database connection established"),
        Ok(false) => tracing::warn!("Database health check returned false"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            // Continue anyway, might recover later
        }
    }

    // Create delivery client and template registry
    let mailer = Mailer::new(&config);
    let templates = TemplateRegistry::new()?;

    // Create application state
    let state = AppState::new(config.clone(), email_logs, mailer, templates);

    // Build router
    let app = Router::new()
        .merge(api::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = config.server_addr().parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(address = %addr, "Server listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Handle shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, shutting down...");
        },
    }
}

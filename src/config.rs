use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    /// Bearer credential for the delivery API. Never logged.
    pub mailerlite_api_key: String,
    pub mailerlite_url: String,
    pub send_timeout_secs: u64,
    /// When false, the raw request `content` is sent as the HTML body
    /// instead of the rendered welcome template.
    pub render_templates: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:mailrelay.db?mode=rwc".to_string()),
            mailerlite_api_key: env::var("MAILERLITE_API_KEY")
                .map_err(|_| ConfigError::MissingApiKey)?,
            mailerlite_url: env::var("MAILERLITE_URL")
                .unwrap_or_else(|_| "https://connect.mailerlite.com/api/email/send".to_string()),
            send_timeout_secs: env::var("SEND_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            render_templates: env::var("RENDER_TEMPLATES")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server port")]
    InvalidPort,
    #[error("MAILERLITE_API_KEY environment variable is required")]
    MissingApiKey,
}

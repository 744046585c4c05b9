use std::sync::Arc;

use crate::config::Config;
use crate::db::EmailLogRepository;
use crate::mail::Mailer;
use crate::templates::TemplateRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub email_logs: Arc<EmailLogRepository>,
    pub mailer: Arc<Mailer>,
    pub templates: Arc<TemplateRegistry>,
}

impl AppState {
    pub fn new(
        config: Config,
        email_logs: EmailLogRepository,
        mailer: Mailer,
        templates: TemplateRegistry,
    ) -> Self {
        Self {
            config: Arc::new(config),
            email_logs: Arc::new(email_logs),
            mailer: Arc::new(mailer),
            templates: Arc::new(templates),
        }
    }
}

use minijinja::{context, Environment};
use serde_json::Value;

const WELCOME_TEMPLATE: &str = include_str!("../templates/welcome.html");

/// Static pages served by the HTTP surface
pub const INDEX_PAGE: &str = include_str!("../templates/index.html");
pub const STATUS_PAGE: &str = include_str!("../templates/status.html");

/// Email templates, compiled once at startup
pub struct TemplateRegistry {
    env: Environment<'static>,
}

impl TemplateRegistry {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("welcome", WELCOME_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Render the welcome email body. Each variable falls back to its
    /// documented default when absent from `template_data`; string and
    /// numeric values are both accepted.
    pub fn render_welcome(
        &self,
        recipient_name: &str,
        template_data: Option<&Value>,
    ) -> Result<String, minijinja::Error> {
        let var = |key: &str, default: &str| -> String {
            match template_data.and_then(|data| data.get(key)) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => default.to_string(),
            }
        };

        let user_name = if recipient_name.trim().is_empty() {
            "User".to_string()
        } else {
            recipient_name.to_string()
        };

        let template = self.env.get_template("welcome")?;
        template.render(context! {
            user_name,
            company_name => var("company_name", "Our Company"),
            login_url => var("login_url", "#"),
            support_url => var("support_url", "#"),
            year => var("year", "2026"),
        })
    }
}

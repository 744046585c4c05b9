pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod mail;
pub mod models;
pub mod state;
pub mod templates;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;

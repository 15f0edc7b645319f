use thiserror::Error;

pub mod app_config;
pub mod campaign;
pub mod config;

pub use app_config::{AppConfig, Environment};
pub use campaign::{CampaignInput, DEFAULT_GOAL};
pub use config::{load_app_config, load_app_config_from_env};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

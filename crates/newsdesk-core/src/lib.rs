//! Shared types and configuration for newsdesk.
//!
//! Holds the [`Article`] record that flows through fetch, enrichment and
//! persistence, the outlet/category file loader, and the environment-driven
//! [`AppConfig`].

pub mod app_config;
pub mod article;
pub mod config;
pub mod outlets;

use thiserror::Error;

pub use app_config::AppConfig;
pub use article::Article;
pub use config::{load_app_config, load_app_config_from_env};
pub use outlets::{load_config, parse_config, NewsConfig, Outlet, Outlets};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read config file {path}: {source}")]
    ConfigFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    ConfigFileParse(#[from] serde_json::Error),

    #[error("config validation failed: {0}")]
    Validation(String),
}

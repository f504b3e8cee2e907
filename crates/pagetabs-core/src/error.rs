//! Tab bar error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabBarError {
    #[error("Paged container has no adapter")]
    MissingAdapter,

    #[error("Configuration parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

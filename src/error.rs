//! Error types for the health dashboard application

use thiserror::Error;

use crate::provider::ProviderError;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error, including a provider missing a required metric type
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Health-data provider error
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Metrics encoding error
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// Address parsing error
    #[error("Address parse error")]
    AddrParse(#[from] std::net::AddrParseError),

    /// Provider fixture could not be parsed
    #[error("Fixture error: {0}")]
    Fixture(#[from] serde_json::Error),

    /// Provider fixture parsed but holds values the store cannot accept
    #[error("Invalid fixture: {0}")]
    InvalidFixture(String),
}

/// Convenient alias for Result with application error
pub type Result<T> = std::result::Result<T, AppError>;

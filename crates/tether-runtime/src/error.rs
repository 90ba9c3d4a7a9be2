//! Error types for the Tether runtime layer.

use thiserror::Error;

/// Errors produced while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Extraction from the layered sources failed.
    #[error("configuration extraction failed: {0}")]
    Figment(#[from] Box<figment::Error>),

    /// The configuration file does not exist.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// The extracted configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    Validation(String),

    /// Bridging into the core configuration document failed.
    #[error(transparent)]
    Core(#[from] tether_core::ConfigError),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

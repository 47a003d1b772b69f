//! Error types for Murmur.
//!
//! Synthesis requests never fail: a declined request is reported as `false`.
//! These errors cover the fallible edges around synthesis: configuration,
//! composition, and the speech providers plugged into the pipeline.

use thiserror::Error;

/// Primary error type for all fallible Murmur operations.
#[derive(Error, Debug)]
pub enum MurmurError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Provider error: {provider} — {message}")]
    Provider { provider: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification of a [`MurmurError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    InvalidInput,
    Provider,
    Io,
    Serialization,
    Unknown,
}

impl MurmurError {
    /// Create a provider error.
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) | Self::Toml(_) => ErrorCategory::Configuration,
            Self::InvalidArgument(_) => ErrorCategory::InvalidInput,
            Self::Provider { .. } => ErrorCategory::Provider,
            Self::Io(_) => ErrorCategory::Io,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::UnsupportedOperation(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self.category(), ErrorCategory::Provider)
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, MurmurError>;

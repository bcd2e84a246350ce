//! Core error types for taskview-core.
//!
//! Every failure a query can hit is a value of [`QueryError`]; nothing is
//! thrown past the [`crate::service::QueryService`] boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single perspective query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// The provider call could not be completed (spawn, transport, IO).
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider answered with `success: false`. Carries its message verbatim.
    #[error("{0}")]
    ProviderReported(String),

    /// The provider payload could not be parsed into the expected structure.
    #[error("Malformed provider response: {message}")]
    MalformedResponse { message: String, raw: String },

    /// Caller-supplied criteria are inconsistent. Raised before any provider call.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl QueryError {
    /// Stable machine-readable tag for the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::ProviderUnavailable(_) => "provider_unavailable",
            QueryError::ProviderReported(_) => "provider_reported_error",
            QueryError::MalformedResponse { .. } => "malformed_response",
            QueryError::Validation(_) => "validation_error",
        }
    }

    /// The raw payload, for malformed responses only.
    pub fn raw_payload(&self) -> Option<&str> {
        match self {
            QueryError::MalformedResponse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Result budget must be a positive integer
    #[error("Invalid budget {0}: must be a positive integer")]
    InvalidBudget(i64),

    /// Duration bounds cross each other
    #[error("Invalid duration range: min_estimated_minutes ({min}) exceeds max_estimated_minutes ({max})")]
    InvalidDurationRange { min: u32, max: u32 },

    /// Perspective name is blank
    #[error("Perspective name must not be empty")]
    EmptyPerspective,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for QueryError
pub type Result<T, E = QueryError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_reported_displays_message_verbatim() {
        let err = QueryError::ProviderReported("Perspective not found".into());
        assert_eq!(err.to_string(), "Perspective not found");
        assert_eq!(err.kind(), "provider_reported_error");
    }

    #[test]
    fn malformed_keeps_raw_payload() {
        let err = QueryError::MalformedResponse {
            message: "expected value".into(),
            raw: "<html>".into(),
        };
        assert_eq!(err.raw_payload(), Some("<html>"));
        assert_eq!(err.kind(), "malformed_response");
    }

    #[test]
    fn validation_converts_into_query_error() {
        let err: QueryError = ValidationError::InvalidBudget(0).into();
        assert_eq!(err.kind(), "validation_error");
        assert!(err.to_string().contains("positive integer"));
    }
}

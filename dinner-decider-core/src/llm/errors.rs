//! Error types for completion calls
//!
//! Every failure reaching a language model ends up here, whether the endpoint
//! is unreachable, rejects the request, or answers with something unreadable.

use std::time::Duration;
use thiserror::Error;

/// Main error type for LLM operations
#[derive(Debug, Error)]
pub enum LLMError {
    /// Request timed out
    #[error("Request timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Network error occurred
    #[error("Network error: {message}")]
    NetworkError { message: String },

    /// API returned an error
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Invalid request parameters
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Model not found or not available
    #[error("Model '{model}' not found or not available")]
    ModelNotFound { model: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    /// Parsing or serialization error
    #[error("Parsing error: {message}")]
    ParseError { message: String },
}

impl LLMError {
    /// Create a timeout error
    pub fn timeout(duration: Duration) -> Self {
        Self::Timeout { duration }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError { message: message.into() }
    }

    /// Create an API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError { status, message: message.into() }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest { message: message.into() }
    }

    /// Create a model not found error
    pub fn model_not_found(model: impl Into<String>) -> Self {
        Self::ModelNotFound { model: model.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigurationError { message: message.into() }
    }
}

/// Convert from JSON errors
impl From<serde_json::Error> for LLMError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError { message: err.to_string() }
    }
}

/// Convert from HTTP client errors
impl From<reqwest::Error> for LLMError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::ParseError { message: err.to_string() }
        } else if let Some(status) = err.status() {
            Self::ApiError { status: status.as_u16(), message: err.to_string() }
        } else {
            Self::NetworkError { message: err.to_string() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LLMError::api(500, "model crashed");
        assert_eq!(err.to_string(), "API error (status 500): model crashed");

        let err = LLMError::timeout(Duration::from_secs(30));
        assert!(err.to_string().contains("timed out"));

        let err = LLMError::model_not_found("llama3");
        assert_eq!(err.to_string(), "Model 'llama3' not found or not available");
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let llm_err: LLMError = json_err.into();
        assert!(matches!(llm_err, LLMError::ParseError { .. }));
    }
}

//! Error types for the coin board

use reqwest::StatusCode;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur when fetching from one of the remote endpoints
///
/// Cheap to clone: the store and the news feed keep the last error around
/// for the view.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Transport failure (DNS, connect, timeout, body read)
    #[error("Network error: {0}")]
    Network(#[source] Arc<reqwest::Error>),

    /// Endpoint answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider cannot be used with the current configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FetchError {
    /// Creates an Http error
    pub fn http(status: StatusCode, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Creates an InvalidResponse error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Creates a Config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether trying the same request again later can succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::Config(_))
    }

    /// Short message suitable for showing next to a retry control
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Network(_) => {
                "Failed to load data. Please check your connection and try again.".to_string()
            }
            FetchError::Http { status, .. } => {
                format!("Failed to load data (HTTP {}). Please try again later.", status.as_u16())
            }
            FetchError::InvalidResponse(_) => {
                "Received unexpected data. Please try again later.".to_string()
            }
            FetchError::Config(msg) => msg.clone(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Network(Arc::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = FetchError::http(StatusCode::SERVICE_UNAVAILABLE, "down");
        assert_eq!(err.to_string(), "HTTP 503 Service Unavailable: down");
        assert!(err.is_retryable());
        assert!(err.user_message().contains("503"));
    }

    #[test]
    fn test_config_error_not_retryable() {
        let err = FetchError::config("NEWS_API_KEY is not set");
        assert!(!err.is_retryable());
        assert_eq!(err.user_message(), "NEWS_API_KEY is not set");
    }

    #[tokio::test]
    async fn test_network_error_keeps_kind_when_cloned() {
        // nothing listens on port 1
        let err: FetchError = reqwest::Client::new()
            .get("http://127.0.0.1:1/")
            .send()
            .await
            .unwrap_err()
            .into();

        let copy = err.clone();
        assert!(matches!(copy, FetchError::Network(_)));
        assert_eq!(copy.user_message(), err.user_message());
        assert!(copy.user_message().contains("check your connection"));
        assert!(std::error::Error::source(&copy).is_some());
    }
}

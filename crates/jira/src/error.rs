//! Error types for the Jira client.

use reqwest::StatusCode;
use thiserror::Error;

/// Result alias used throughout the client.
pub type Result<T> = std::result::Result<T, JiraError>;

/// Errors returned by [`crate::JiraClient`].
#[derive(Debug, Error)]
pub enum JiraError {
    /// The API answered 404 for the requested resource
    #[error("Resource not found: {method} {endpoint}")]
    NotFound {
        method: String,
        endpoint: String,
        body: String,
    },

    /// The API answered with a non-success status other than 404
    #[error("{method} {endpoint} failed with status {status}: {body}")]
    Api {
        method: String,
        endpoint: String,
        status: StatusCode,
        body: String,
    },

    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded into the expected type
    #[error("Failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// Request body could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Client configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// A create call did not return the `Location` header it should have
    #[error("No Location header returned by {endpoint}")]
    MissingLocation { endpoint: String },
}

impl JiraError {
    /// Whether the API reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// HTTP status carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let err = JiraError::NotFound {
            method: "GET".to_string(),
            endpoint: "rest/api/2/issue/1".to_string(),
            body: String::new(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_api_error_message_includes_body() {
        let err = JiraError::Api {
            method: "POST".to_string(),
            endpoint: "rest/api/2/issue".to_string(),
            status: StatusCode::BAD_REQUEST,
            body: r#"{"errors":{"summary":"required"}}"#.to_string(),
        };
        assert!(!err.is_not_found());
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert!(err.to_string().contains("summary"));
        assert!(err.to_string().contains("400"));
    }

    #[test]
    fn test_config_error_has_no_status() {
        let err = JiraError::Config("missing url".to_string());
        assert_eq!(err.status(), None);
    }
}

//! Error types for the completion client

use thiserror::Error;

/// Errors that can occur when calling the completion API
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Non-success HTTP status from the upstream
    #[error("HTTP error (status {status}): {body}")]
    HttpError { status: u16, body: String },

    /// Connection failures, timeouts, TLS problems
    #[error("Transport error: {0}")]
    TransportError(String),

    /// JSON encoding/decoding issues
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Response parsed but lacks `choices[0].message.content`
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Client could not be constructed
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for CompletionError {
    fn from(err: serde_json::Error) -> Self {
        CompletionError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            CompletionError::HttpError {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else if err.is_decode() {
            CompletionError::SerializationError(err.to_string())
        } else {
            CompletionError::TransportError(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error() {
        let err = CompletionError::HttpError {
            status: 402,
            body: "Insufficient credits".to_string(),
        };
        assert!(err.to_string().contains("402"));
        assert!(err.to_string().contains("Insufficient credits"));
    }

    #[test]
    fn test_malformed_response() {
        let err = CompletionError::MalformedResponse("no choices".to_string());
        assert_eq!(err.to_string(), "Malformed response: no choices");
    }

    #[test]
    fn test_from_serde_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: CompletionError = json_err.into();
        assert!(matches!(err, CompletionError::SerializationError(_)));
    }
}

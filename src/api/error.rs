//! Errors from talking to the planner backend.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Base URL or token missing from the config
    #[error("Backend not configured: {0}")]
    NotConfigured(&'static str),

    /// Backend answered with a non-success status
    #[error("API request failed: {status} - {body}")]
    Status { status: reqwest::StatusCode, body: String },

    /// Request never got a response
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Response body was not the JSON we expected
    #[error("Unexpected response: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ApiError {
    /// True when the backend could not be reached at all
    pub fn is_offline(&self) -> bool {
        match self {
            ApiError::Network(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }

    /// True when the stored token was rejected
    pub fn needs_reauth(&self) -> bool {
        matches!(
            self,
            ApiError::Status { status, .. }
                if *status == reqwest::StatusCode::UNAUTHORIZED || *status == reqwest::StatusCode::FORBIDDEN
        )
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err)
        } else {
            ApiError::Network(err)
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_flag_reauth() {
        let err = ApiError::Status { status: reqwest::StatusCode::UNAUTHORIZED, body: String::new() };
        assert!(err.needs_reauth());
        assert!(!err.is_offline());

        let err = ApiError::Status { status: reqwest::StatusCode::BAD_GATEWAY, body: "upstream".into() };
        assert!(!err.needs_reauth());
        assert_eq!(err.to_string(), "API request failed: 502 Bad Gateway - upstream");
    }

    #[test]
    fn not_configured_is_not_offline() {
        let err = ApiError::NotConfigured("missing token");
        assert!(!err.is_offline());
        assert_eq!(err.to_string(), "Backend not configured: missing token");
    }
}

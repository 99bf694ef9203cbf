//! Error types for the feeds module

use thiserror::Error;

/// Errors that can occur while fetching a source's ranked list
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// API returned an error response
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Failed to parse API response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Response parsed but reported a status other than success/cache
    #[error("Unexpected response status: {0}")]
    UnexpectedStatus(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<FeedError> for radar_core::RadarError {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::RequestFailed(_) | FeedError::ApiError { .. } => Self::network(err.to_string()),
            FeedError::ParseError(_) | FeedError::UnexpectedStatus(_) => Self::parse(err.to_string()),
            FeedError::InvalidConfig(_) => Self::config(err.to_string()),
        }
    }
}

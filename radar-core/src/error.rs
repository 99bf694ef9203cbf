//! Error types for the radar

use thiserror::Error;

/// Radar-wide error type
#[derive(Error, Debug)]
pub enum RadarError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl RadarError {
    pub fn network(msg: impl Into<String>) -> Self {
        RadarError::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        RadarError::Parse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        RadarError::Config(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        RadarError::Io(msg.into())
    }
}

impl From<std::io::Error> for RadarError {
    fn from(err: std::io::Error) -> Self {
        RadarError::Io(err.to_string())
    }
}

/// Result type alias for radar operations
pub type RadarResult<T> = Result<T, RadarError>;

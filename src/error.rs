//! Error types

use thiserror::Error;

/// Errors raised across the crate
#[derive(Error, Debug)]
pub enum SovereignError {
    #[error("generation request failed: {0}")]
    Transport(String),

    #[error("generation service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed generation response: {0}")]
    MalformedResponse(String),

    #[error("generation service offline")]
    Offline,

    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),

    #[error("invalid configuration {key}: {value}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for SovereignError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SovereignError::MalformedResponse(err.to_string())
        } else {
            SovereignError::Transport(err.to_string())
        }
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, SovereignError>;

use thiserror::Error;
use http::StatusCode;
use parquet::errors::ParquetError;
use arrow::error::ArrowError;
use crate::models::Platform;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status code: {0}")]
    Status(StatusCode),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Forbidden - Access denied")]
    Forbidden,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{platform} app id not found in URL: {url}")]
    IdentifierNotFound { platform: Platform, url: String },

    #[error("{platform} is unreachable: {reason}")]
    Unreachable { platform: Platform, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),
}

impl Error {
    /// True when the request never reached the server (refused, DNS, TLS).
    pub fn is_connect(&self) -> bool {
        match self {
            Error::Http(e) => e.is_connect(),
            _ => false,
        }
    }
}

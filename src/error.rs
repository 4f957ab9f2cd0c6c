use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised by the indicator functions on invalid parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaError {
    #[error("{indicator}: length must be positive, got {length}")]
    InvalidLength {
        indicator: &'static str,
        length: usize,
    },
}

/// Errors raised while fetching a quote history.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("unknown ticker `{0}`")]
    UnknownTicker(String),
    #[error("no price data returned for `{0}`")]
    Empty(String),
    #[error("data provider error {code}: {description}")]
    Api { code: String, description: String },
    #[error("malformed chart payload: {0}")]
    Malformed(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read environment: {0}")]
    Env(#[from] envy::Error),
    #[error("{name} must be positive")]
    NonPositive { name: &'static str },
    #[error("EMA_FAST ({fast}) must be shorter than EMA_SLOW ({slow})")]
    SpanOrder { fast: usize, slow: usize },
}

/// Errors raised while assembling the merged indicator frame.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error(transparent)]
    Ta(#[from] TaError),
    #[error(transparent)]
    Polars(#[from] PolarsError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("price history is empty")]
    Empty,
    #[error("timestamp {0} is out of range")]
    Timestamp(i64),
}

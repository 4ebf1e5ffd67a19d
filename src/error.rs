use thiserror::Error;

/// Why a Price Source lookup failed. Always recoverable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("collection not found")]
    NotFound,

    #[error("unauthorized: API key missing or invalid")]
    Unauthorized,

    #[error("rate limit exceeded, try again later")]
    RateLimited,

    #[error("request timed out")]
    Timeout,

    #[error("connection error: {0}")]
    ConnectionError(String),

    #[error("upstream error: HTTP {0}")]
    UpstreamError(u16),

    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    /// Short stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::NotFound => "not_found",
            FetchError::Unauthorized => "unauthorized",
            FetchError::RateLimited => "rate_limited",
            FetchError::Timeout => "timeout",
            FetchError::ConnectionError(_) => "connection",
            FetchError::UpstreamError(_) => "upstream",
            FetchError::InvalidResponse(_) => "invalid_response",
        }
    }
}

#[derive(Error, Debug, Clone)]
#[error("store error: {0}")]
pub struct StoreError(pub String);

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        StoreError(e.to_string())
    }
}

#[derive(Error, Debug, Clone)]
pub enum DeliveryError {
    #[error("delivery transport error: {0}")]
    Transport(String),

    #[error("delivery rejected ({status}): {description}")]
    Rejected { status: u16, description: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is missing, copy .env.example to .env and fill it in")]
    Missing(&'static str),

    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("collection slug must be letters, digits, '-' or '_'")]
    InvalidCollection,

    #[error("threshold must be a positive number")]
    InvalidThreshold,

    #[error(transparent)]
    Upstream(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

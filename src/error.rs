use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid skill catalogue: {0}")]
    InvalidCatalogue(String),

    #[error("{name} must be at least 1, got {value}")]
    ThresholdOutOfRange { name: &'static str, value: u32 },

    #[error("Job source error: {0}")]
    SourceApi(String),

    #[error("Rate limit exceeded, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::RateLimited(_) | Error::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_message_names_parameter() {
        let err = Error::ThresholdOutOfRange {
            name: "min_frequency",
            value: 0,
        };
        assert_eq!(err.to_string(), "min_frequency must be at least 1, got 0");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_rate_limited_is_retryable() {
        assert!(Error::RateLimited(30).is_retryable());
        assert!(!Error::InvalidCatalogue("empty".to_string()).is_retryable());
    }
}

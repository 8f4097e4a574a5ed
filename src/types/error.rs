//! Error types

use thiserror::Error;

/// Failure of a single source within a round.
///
/// Always recovered inside the aggregator; never crosses the round boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error("timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Errors surfaced to the CLI and TUI layers
#[derive(Debug, Error)]
pub enum PricewatchError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Snapshot contains no prices")]
    EmptySnapshot,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PricewatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_messages() {
        assert_eq!(
            SourceError::Timeout { after_ms: 5000 }.to_string(),
            "timed out after 5000ms"
        );
        assert_eq!(
            SourceError::Parse("missing field `price`".into()).to_string(),
            "parse error: missing field `price`"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PricewatchError = io.into();
        assert!(matches!(err, PricewatchError::Io(_)));
    }
}

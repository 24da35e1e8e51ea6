//! Error types shared across the pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading profanity corpora.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Corpus path not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read corpus file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Corpus directory has no entries: {0}")]
    EmptyFile(PathBuf),
    #[error("Invalid corpus pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors raised while loading the common-password blacklist.
#[derive(Error, Debug)]
pub enum BlacklistError {
    #[error("Blacklist file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read blacklist file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Blacklist file is empty")]
    EmptyFile,
}

/// Root error type for the guard.
///
/// Detection and normalization never return these; they degrade to
/// conservative defaults instead. Only construction and the network-bound
/// breach lookup surface errors to callers.
#[derive(Error, Debug)]
pub enum GuardError {
    /// Empty or malformed input to the breach checker.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A detection engine could not be built.
    #[error("engine {engine} unavailable: {reason}")]
    EngineUnavailable { engine: &'static str, reason: String },

    /// The breach API could not be reached.
    #[error("breach lookup failed: {0}")]
    NetworkFailure(String),

    /// The breach API did not answer within the configured timeout.
    #[error("breach lookup timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The breach API answered with a non-2xx status.
    #[error("breach API returned status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("malformed breach API response: {0}")]
    MalformedResponse(String),

    #[error("breach lookup cancelled")]
    Cancelled,

    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    Blacklist(#[from] BlacklistError),
}

impl GuardError {
    /// True for failures caused by the remote service rather than the input.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            GuardError::NetworkFailure(_)
                | GuardError::Timeout { .. }
                | GuardError::UnexpectedStatus { .. }
                | GuardError::MalformedResponse(_)
        )
    }
}

pub type GuardResult<T> = Result<T, GuardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_classification() {
        assert!(GuardError::NetworkFailure("down".into()).is_network());
        assert!(GuardError::Timeout { timeout_ms: 10_000 }.is_network());
        assert!(GuardError::UnexpectedStatus { status: 503 }.is_network());
        assert!(!GuardError::InvalidArgument("empty".into()).is_network());
        assert!(!GuardError::Cancelled.is_network());
    }

    #[test]
    fn test_display_messages() {
        let err = GuardError::EngineUnavailable {
            engine: "advanced",
            reason: "regex too large".into(),
        };
        assert_eq!(err.to_string(), "engine advanced unavailable: regex too large");
        assert_eq!(
            GuardError::Timeout { timeout_ms: 10_000 }.to_string(),
            "breach lookup timed out after 10000ms"
        );
    }
}

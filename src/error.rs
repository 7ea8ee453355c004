//! Error types for the suggestion engine.
//!
//! None of these are fatal. Callers log them and keep the commit path alive.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuggestError {
    /// Reading, writing or serializing persisted history failed. The
    /// in-memory state stays authoritative for the session.
    #[error("persistence failed: {0}")]
    Persistence(String),

    #[error("suggestion request failed: {0}")]
    Network(String),

    /// The endpoint answered with something other than `[query, [..]]`.
    #[error("malformed suggestion response: {0}")]
    Protocol(String),

    #[error("nothing to commit")]
    EmptyCommit,

    #[error("failed to open navigation target: {0}")]
    Navigation(String),
}

impl From<serde_json::Error> for SuggestError {
    fn from(err: serde_json::Error) -> Self {
        SuggestError::Persistence(err.to_string())
    }
}

impl From<std::io::Error> for SuggestError {
    fn from(err: std::io::Error) -> Self {
        SuggestError::Persistence(err.to_string())
    }
}

impl From<reqwest::Error> for SuggestError {
    fn from(err: reqwest::Error) -> Self {
        SuggestError::Network(err.to_string())
    }
}

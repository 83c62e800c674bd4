//! # Scan Error Types Module
//!
//! Failure modes of the primary extractor. None of them is fatal: the
//! reconciler logs them and degrades to the deterministic extractor.

/// Custom error types for primary extraction
#[derive(Debug, Clone)]
pub enum ScanError {
    /// Request could not be sent or the body could not be read
    Transport(String),
    /// No reply within the configured timeout
    Timeout(String),
    /// The service answered with an error status or an empty reply
    Service(String),
    /// The reply contained no usable JSON groups
    MalformedReply(String),
    /// Remote calls are suspended after repeated failures
    CircuitOpen,
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::Transport(msg) => write!(f, "Transport error: {msg}"),
            ScanError::Timeout(msg) => write!(f, "Timeout error: {msg}"),
            ScanError::Service(msg) => write!(f, "Service error: {msg}"),
            ScanError::MalformedReply(msg) => write!(f, "Malformed reply: {msg}"),
            ScanError::CircuitOpen => write!(f, "Circuit open: primary extractor suspended"),
        }
    }
}

impl std::error::Error for ScanError {}

impl From<reqwest::Error> for ScanError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScanError::Timeout(err.to_string())
        } else {
            ScanError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        ScanError::MalformedReply(err.to_string())
    }
}

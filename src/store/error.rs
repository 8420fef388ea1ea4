//! Storage layer error types and operation outcomes

use thiserror::Error;

/// Errors that can occur in the storage layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// No remote identifier/key configured; expected offline condition
    #[error("remote credentials missing")]
    CredentialsMissing,

    /// Network failure or non-success HTTP status from the remote store
    #[error("remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// The remote call did not complete within the configured timeout
    #[error("remote request timed out")]
    Timeout,

    /// A store returned bytes that do not parse as a document
    #[error("malformed data: {0}")]
    MalformedData(String),

    /// Per-collection provider: not all collection writes succeeded
    #[error("partial remote failure: {succeeded}/{total} collection writes succeeded")]
    PartialRemoteFailure { succeeded: usize, total: usize },

    /// Local file I/O failed (quota, permissions, missing directory)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failed
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Timeout
        } else {
            StoreError::RemoteUnavailable(err.to_string())
        }
    }
}

/// Result type alias for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Where a saved document ended up
///
/// `save_data` never fails outright; this tells the caller whether the
/// remote write also landed, e.g. to drive a connectivity indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Local and remote both hold the document
    Synced,
    /// Remote write failed or no remote is configured; local copy is durable
    LocalOnly,
}

/// What the reconciliation pass decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Remote was newer (or local empty); remote copy adopted locally
    AdoptedCloud,
    /// Local was newer (or remote empty); local copy pushed to the remote
    PushedLocal,
    /// Both sides already agree; nothing propagated
    InSync,
    /// Remote unreachable or failed; local copy returned unmodified
    LocalFallback,
    /// Neither side had data; a fresh empty document was created
    Initialized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::CredentialsMissing;
        assert_eq!(err.to_string(), "remote credentials missing");

        let err = StoreError::PartialRemoteFailure {
            succeeded: 2,
            total: 5,
        };
        assert_eq!(
            err.to_string(),
            "partial remote failure: 2/5 collection writes succeeded"
        );
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let store_err: StoreError = parse_err.into();
        assert!(matches!(store_err, StoreError::Serialization(_)));
    }
}

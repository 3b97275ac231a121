//! Usage client errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UsageError {
    /// No usage matches the natural key. A signal, not necessarily fatal.
    #[error("no usage found for the requested node")]
    NotFound,

    /// The repository rejected a usage creation.
    #[error("usage creation rejected: {0}")]
    CreateFailed(String),

    /// The repository rejected a usage lookup for a reason other than a
    /// missing usage.
    #[error("usage lookup rejected: {0}")]
    LookupFailed(String),

    /// The repository rejected a usage deletion. An already-deleted usage
    /// is not an error; see [`crate::usage::DeleteOutcome`].
    #[error("usage deletion rejected: {0}")]
    DeleteFailed(String),

    /// Transport-level fault (timeout, DNS, TLS).
    #[error("repository service unreachable: {0}")]
    Remote(String),
}

impl From<reqwest::Error> for UsageError {
    fn from(error: reqwest::Error) -> Self {
        Self::Remote(error.to_string())
    }
}

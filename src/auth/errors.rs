//! Auth errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No usable ticket could be obtained from the repository service.
    #[error("authentication against the repository service failed: {0}")]
    Failed(String),

    /// Transport-level fault (timeout, DNS, TLS).
    #[error("repository service unreachable: {0}")]
    Remote(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Remote(error.to_string())
    }
}

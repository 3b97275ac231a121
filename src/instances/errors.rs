//! Instance lifecycle errors.

use thiserror::Error;

use crate::{auth::AuthError, usage::ObjectUrlError, usage::UsageError};

#[derive(Debug, Error)]
pub enum InstancesServiceError {
    /// No local row with the requested id.
    #[error("resource instance not found")]
    NotFound,

    /// The stored remote object URL could not be parsed.
    #[error("invalid object url")]
    ObjectUrl(#[from] ObjectUrlError),

    /// Ticket acquisition failed.
    #[error("ticket acquisition failed")]
    Auth(#[from] AuthError),

    /// A remote usage operation failed.
    #[error("usage operation failed")]
    Usage(#[from] UsageError),

    /// Local storage error.
    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}

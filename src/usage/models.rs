//! Usage data models and the remote object URL.

use thiserror::Error;

use crate::ids::{CourseId, InstanceUuid};

/// Scheme of remote object URLs stored on a resource instance.
pub const OBJECT_URL_SCHEME: &str = "ccrep://";

/// Version selector for a remote node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ObjectVersion {
    /// Track the newest version of the node.
    #[default]
    Latest,

    /// Pin an exact node version.
    Exact(String),
}

impl ObjectVersion {
    /// Wire encoding; the repository treats `"0"` as "latest".
    #[must_use]
    pub fn as_wire(&self) -> &str {
        match self {
            Self::Latest => "0",
            Self::Exact(version) => version,
        }
    }

    /// Inverse of [`ObjectVersion::as_wire`].
    #[must_use]
    pub fn from_wire(version: String) -> Self {
        if version == "0" {
            Self::Latest
        } else {
            Self::Exact(version)
        }
    }

    #[must_use]
    pub const fn is_latest(&self) -> bool {
        matches!(self, Self::Latest)
    }
}

/// Natural key of a usage: which node is embedded where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRequest {
    pub course_id: CourseId,
    pub resource_id: InstanceUuid,
    pub node_id: String,
    pub node_version: String,
}

/// Usage record as returned by the repository service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Usage {
    pub usage_id: String,
    pub node_version: String,
}

/// Remote node reference parsed from an object URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    pub repository_id: String,
    pub node_id: String,
}

#[derive(Debug, Error)]
#[error("object url is not a valid ccrep reference: {0}")]
pub struct ObjectUrlError(String);

impl NodeRef {
    /// Parse `ccrep://<repository>/<node-id>`.
    ///
    /// # Errors
    ///
    /// Returns an error when the scheme is wrong or either segment is
    /// missing or empty.
    pub fn parse(url: &str) -> Result<Self, ObjectUrlError> {
        let rest = url
            .strip_prefix(OBJECT_URL_SCHEME)
            .ok_or_else(|| ObjectUrlError(url.to_owned()))?;

        let (repository_id, node_id) = rest
            .split_once('/')
            .ok_or_else(|| ObjectUrlError(url.to_owned()))?;

        if repository_id.is_empty() || node_id.is_empty() {
            return Err(ObjectUrlError(url.to_owned()));
        }

        Ok(Self {
            repository_id: repository_id.to_owned(),
            node_id: node_id.to_owned(),
        })
    }
}

//! Typed identifiers.

use std::fmt::{Display, Formatter, Result as FmtResult};

use uuid::Uuid;

/// Identifier of a local resource instance row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceUuid(Uuid);

impl InstanceUuid {
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn into_uuid(self) -> Uuid {
        self.0
    }

    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Display for InstanceUuid {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for InstanceUuid {
    fn from(value: Uuid) -> Self {
        Self::from_uuid(value)
    }
}

impl From<InstanceUuid> for Uuid {
    fn from(value: InstanceUuid) -> Self {
        value.into_uuid()
    }
}

/// Identifier of the embedding container (a course in the host CMS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CourseId(i64);

impl CourseId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn into_i64(self) -> i64 {
        self.0
    }
}

impl Display for CourseId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl From<i64> for CourseId {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

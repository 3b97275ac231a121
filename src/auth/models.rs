//! Principal and ticket data models.

use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use jiff::{SignedDuration, Timestamp};
use zeroize::Zeroize;

/// The authenticated user a ticket is requested for.
///
/// Supplied by the host CMS per request; never persisted by this crate.
#[derive(Debug, Clone)]
pub struct Principal {
    /// Stable identifier inside the host CMS.
    pub id: String,

    pub first_name: String,
    pub last_name: String,
    pub email: String,

    /// Extra profile attributes forwarded during ticket issuance.
    pub attributes: BTreeMap<String, String>,
}

impl Principal {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            attributes: BTreeMap::new(),
        }
    }
}

/// Opaque access credential issued by the repository service.
///
/// Bound to a single principal; the token never rotates on revalidation,
/// only `validated_at` moves forward.
#[derive(Clone)]
pub struct Ticket {
    token: String,
    validated_at: Timestamp,
}

impl Ticket {
    #[must_use]
    pub fn new(token: String, validated_at: Timestamp) -> Self {
        Self {
            token,
            validated_at,
        }
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn validated_at(&self) -> Timestamp {
        self.validated_at
    }

    /// Time elapsed since the last successful validation.
    #[must_use]
    pub fn age(&self, now: Timestamp) -> SignedDuration {
        now.duration_since(self.validated_at)
    }

    /// Same token with the validation timestamp moved to `now`.
    #[must_use]
    pub(crate) fn refreshed(&self, now: Timestamp) -> Self {
        Self {
            token: self.token.clone(),
            validated_at: now,
        }
    }
}

impl Debug for Ticket {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Ticket")
            .field("token", &"**redacted**")
            .field("validated_at", &self.validated_at)
            .finish()
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        self.token.zeroize();
    }
}

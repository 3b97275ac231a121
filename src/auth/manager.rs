//! Ticket acquisition policy.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use jiff::{SignedDuration, Timestamp};
use tracing::debug;

use crate::auth::{AuthClient, AuthError, Principal, Ticket, TicketCache};

/// Produces a valid ticket for the current principal, consulting the cache
/// before going to the repository service.
///
/// A cached ticket younger than the freshness window is reused without any
/// remote call. An older one is revalidated remotely; success refreshes its
/// timestamp and keeps the token, while any rejection or transport fault
/// discards it, after which a single fresh issue attempt is made.
pub struct TicketManager {
    auth: Arc<dyn AuthClient>,
    cache: Mutex<TicketCache>,
    window: SignedDuration,
}

impl TicketManager {
    #[must_use]
    pub fn new(auth: Arc<dyn AuthClient>, window: SignedDuration) -> Self {
        Self {
            auth,
            cache: Mutex::new(TicketCache::new()),
            window,
        }
    }

    #[must_use]
    pub fn window(&self) -> SignedDuration {
        self.window
    }

    /// Obtain a ticket token for `principal`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Failed`] when the repository refuses to issue a
    /// ticket, or [`AuthError::Remote`] when the issue call cannot reach it.
    /// There is no retry beyond the single re-issue after a failed
    /// revalidation.
    pub async fn get_ticket(&self, principal: &Principal) -> Result<String, AuthError> {
        let now = Timestamp::now();

        let cached = self.lock_cache().get(&principal.id).cloned();

        if let Some(ticket) = cached {
            if TicketCache::is_fresh(&ticket, now, self.window) {
                debug!(principal = %principal.id, "reusing fresh ticket");
                return Ok(ticket.token().to_owned());
            }

            match self.auth.validate_ticket(ticket.token()).await {
                Ok(true) => {
                    let refreshed = ticket.refreshed(Timestamp::now());
                    let token = refreshed.token().to_owned();

                    self.lock_cache().put(&principal.id, refreshed);
                    debug!(principal = %principal.id, "revalidated stale ticket");

                    return Ok(token);
                }
                Ok(false) => {
                    debug!(principal = %principal.id, "stale ticket rejected; requesting a new one");
                }
                Err(error) => {
                    debug!(
                        principal = %principal.id,
                        %error,
                        "ticket validation unreachable; requesting a new one"
                    );
                }
            }

            self.lock_cache().invalidate(&principal.id);
        }

        let token = self.auth.issue_ticket(principal).await?;

        self.lock_cache()
            .put(&principal.id, Ticket::new(token.clone(), Timestamp::now()));

        Ok(token)
    }

    fn lock_cache(&self) -> MutexGuard<'_, TicketCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    pub(crate) fn seed(&self, principal_id: &str, ticket: Ticket) {
        self.lock_cache().put(principal_id, ticket);
    }

    #[cfg(test)]
    pub(crate) fn cached(&self, principal_id: &str) -> Option<Ticket> {
        self.lock_cache().get(principal_id).cloned()
    }
}

impl Debug for TicketManager {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("TicketManager")
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::auth::MockAuthClient;

    use super::*;

    const WINDOW: SignedDuration = SignedDuration::from_secs(10);

    fn principal() -> Principal {
        Principal::new("instructor01", "Ada", "Lovelace", "ada@example.edu")
    }

    fn manager(auth: MockAuthClient) -> TicketManager {
        TicketManager::new(Arc::new(auth), WINDOW)
    }

    #[tokio::test]
    async fn fresh_ticket_is_reused_without_remote_calls() -> TestResult {
        let mut auth = MockAuthClient::new();
        auth.expect_validate_ticket().never();
        auth.expect_issue_ticket().never();

        let manager = manager(auth);
        let seeded_at = Timestamp::now() - SignedDuration::from_secs(2);
        manager.seed("instructor01", Ticket::new("T1".to_owned(), seeded_at));

        let token = manager.get_ticket(&principal()).await?;

        assert_eq!(token, "T1");
        Ok(())
    }

    #[tokio::test]
    async fn stale_ticket_is_revalidated_and_timestamp_refreshed() -> TestResult {
        let mut auth = MockAuthClient::new();
        auth.expect_validate_ticket()
            .withf(|ticket| ticket == "T1")
            .times(1)
            .returning(|_| Ok(true));
        auth.expect_issue_ticket().never();

        let manager = manager(auth);
        let seeded_at = Timestamp::now() - SignedDuration::from_secs(20);
        manager.seed("instructor01", Ticket::new("T1".to_owned(), seeded_at));

        let token = manager.get_ticket(&principal()).await?;

        assert_eq!(token, "T1", "revalidation must keep the same token");

        let cached = manager.cached("instructor01").expect("ticket should stay cached");
        assert!(
            cached.validated_at() > seeded_at,
            "validation timestamp should move forward"
        );
        Ok(())
    }

    #[tokio::test]
    async fn rejected_stale_ticket_is_discarded_and_reissued() -> TestResult {
        let mut auth = MockAuthClient::new();
        auth.expect_validate_ticket().times(1).returning(|_| Ok(false));
        auth.expect_issue_ticket()
            .times(1)
            .returning(|_| Ok("T2".to_owned()));

        let manager = manager(auth);
        let seeded_at = Timestamp::now() - SignedDuration::from_secs(20);
        manager.seed("instructor01", Ticket::new("T1".to_owned(), seeded_at));

        let token = manager.get_ticket(&principal()).await?;

        assert_eq!(token, "T2");
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_validation_is_treated_as_rejection() -> TestResult {
        let mut auth = MockAuthClient::new();
        auth.expect_validate_ticket()
            .times(1)
            .returning(|_| Err(AuthError::Remote("connection timed out".to_owned())));
        auth.expect_issue_ticket()
            .times(1)
            .returning(|_| Ok("T2".to_owned()));

        let manager = manager(auth);
        let seeded_at = Timestamp::now() - SignedDuration::from_secs(20);
        manager.seed("instructor01", Ticket::new("T1".to_owned(), seeded_at));

        let token = manager.get_ticket(&principal()).await?;

        assert_eq!(token, "T2");
        Ok(())
    }

    #[tokio::test]
    async fn missing_ticket_is_issued_and_cached() -> TestResult {
        let mut auth = MockAuthClient::new();
        auth.expect_validate_ticket().never();
        auth.expect_issue_ticket()
            .times(1)
            .returning(|_| Ok("T2".to_owned()));

        let manager = manager(auth);

        let token = manager.get_ticket(&principal()).await?;

        assert_eq!(token, "T2");
        let cached = manager.cached("instructor01").expect("ticket should be cached");
        assert_eq!(cached.token(), "T2");
        Ok(())
    }

    #[tokio::test]
    async fn cached_issue_is_not_repeated_within_the_window() -> TestResult {
        let mut auth = MockAuthClient::new();
        auth.expect_issue_ticket()
            .times(1)
            .returning(|_| Ok("T2".to_owned()));

        let manager = manager(auth);

        let first = manager.get_ticket(&principal()).await?;
        let second = manager.get_ticket(&principal()).await?;

        assert_eq!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn issue_failure_propagates_without_retry() {
        let mut auth = MockAuthClient::new();
        auth.expect_issue_ticket()
            .times(1)
            .returning(|_| Err(AuthError::Failed("unknown application".to_owned())));

        let manager = manager(auth);

        let result = manager.get_ticket(&principal()).await;

        assert!(
            matches!(result, Err(AuthError::Failed(_))),
            "expected AuthError::Failed, got {result:?}"
        );
    }

    #[tokio::test]
    async fn tickets_are_cached_per_principal() -> TestResult {
        let mut auth = MockAuthClient::new();
        auth.expect_issue_ticket()
            .times(1)
            .returning(|_| Ok("TB".to_owned()));

        let manager = manager(auth);
        manager.seed("instructor01", Ticket::new("TA".to_owned(), Timestamp::now()));

        let other = Principal::new("student02", "Grace", "Hopper", "grace@example.edu");
        let token = manager.get_ticket(&other).await?;

        assert_eq!(token, "TB");
        assert_eq!(
            manager.cached("instructor01").expect("seeded ticket stays").token(),
            "TA"
        );
        Ok(())
    }
}

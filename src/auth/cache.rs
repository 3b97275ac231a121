//! Per-principal ticket cache.

use jiff::{SignedDuration, Timestamp};
use rustc_hash::FxHashMap;

use crate::auth::Ticket;

/// Session-scoped cache of the most recent ticket per principal.
///
/// Pure storage: no network I/O and no policy. Freshness decisions live in
/// [`crate::auth::TicketManager`].
#[derive(Debug, Default)]
pub struct TicketCache {
    tickets: FxHashMap<String, Ticket>,
}

impl TicketCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, principal_id: &str) -> Option<&Ticket> {
        self.tickets.get(principal_id)
    }

    pub fn put(&mut self, principal_id: &str, ticket: Ticket) {
        self.tickets.insert(principal_id.to_owned(), ticket);
    }

    pub fn invalidate(&mut self, principal_id: &str) {
        self.tickets.remove(principal_id);
    }

    /// Whether `ticket` was validated less than `window` ago.
    #[must_use]
    pub fn is_fresh(ticket: &Ticket, now: Timestamp, window: SignedDuration) -> bool {
        ticket.age(now) < window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: SignedDuration = SignedDuration::from_secs(10);

    #[test]
    fn put_then_get_returns_the_ticket() {
        let mut cache = TicketCache::new();
        let now = Timestamp::now();

        cache.put("u1", Ticket::new("T1".to_owned(), now));

        let cached = cache.get("u1").expect("ticket should be cached");
        assert_eq!(cached.token(), "T1");
        assert!(cache.get("u2").is_none());
    }

    #[test]
    fn invalidate_discards_the_ticket() {
        let mut cache = TicketCache::new();

        cache.put("u1", Ticket::new("T1".to_owned(), Timestamp::now()));
        cache.invalidate("u1");

        assert!(cache.get("u1").is_none());
    }

    #[test]
    fn ticket_younger_than_window_is_fresh() {
        let now = Timestamp::now();
        let ticket = Ticket::new("T1".to_owned(), now - SignedDuration::from_secs(2));

        assert!(TicketCache::is_fresh(&ticket, now, WINDOW));
    }

    #[test]
    fn ticket_at_window_age_is_stale() {
        let now = Timestamp::now();
        let ticket = Ticket::new("T1".to_owned(), now - WINDOW);

        assert!(!TicketCache::is_fresh(&ticket, now, WINDOW));
    }
}

//! Write-once match ledger.
//!
//! Each ticket can be finalized exactly once. A second `finalize` for the
//! same `TicketId` returns [`BlindRouteError::TicketAlreadyExists`] and
//! leaves the stored winner untouched. Entries are never evicted: a
//! ticket's handle stays stable for as long as the ledger lives.

use std::collections::HashMap;

use blindroute_fhe::Euint32;
use blindroute_types::{BlindRouteError, Principal, Result, TicketId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One finalized routing result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub ticket: TicketId,
    /// Encrypted winning agent id (0 if nobody beat the initial score).
    pub winner: Euint32,
    pub requester: Principal,
    pub routed_at: DateTime<Utc>,
    /// Set once by the dev-only reveal path. Never cleared.
    pub public: bool,
}

impl MatchRecord {
    #[must_use]
    pub fn new(ticket: TicketId, winner: Euint32, requester: Principal) -> Self {
        Self {
            ticket,
            winner,
            requester,
            routed_at: Utc::now(),
            public: false,
        }
    }
}

/// `TicketId → MatchRecord`, insert-only.
#[derive(Debug, Default)]
pub struct MatchLedger {
    records: HashMap<TicketId, MatchRecord>,
}

impl MatchLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a routing result.
    ///
    /// # Errors
    /// Returns [`BlindRouteError::TicketAlreadyExists`] if the ticket was
    /// already finalized.
    pub fn finalize(&mut self, record: MatchRecord) -> Result<()> {
        let ticket = record.ticket;
        if self.records.contains_key(&ticket) {
            return Err(BlindRouteError::TicketAlreadyExists(ticket));
        }
        self.records.insert(ticket, record);
        tracing::debug!(%ticket, total = self.records.len(), "Match finalized");
        Ok(())
    }

    /// The winner handle for `ticket`, if any.
    #[must_use]
    pub fn lookup(&self, ticket: &TicketId) -> Option<Euint32> {
        self.records.get(ticket).map(|r| r.winner)
    }

    /// The full record for `ticket`.
    #[must_use]
    pub fn get(&self, ticket: &TicketId) -> Option<&MatchRecord> {
        self.records.get(ticket)
    }

    #[must_use]
    pub fn contains(&self, ticket: &TicketId) -> bool {
        self.records.contains_key(ticket)
    }

    /// Flag a record as publicly revealed and return its winner.
    ///
    /// # Errors
    /// Returns [`BlindRouteError::NoMatch`] if the ticket was never routed.
    pub fn mark_public(&mut self, ticket: &TicketId) -> Result<Euint32> {
        let record = self
            .records
            .get_mut(ticket)
            .ok_or(BlindRouteError::NoMatch(*ticket))?;
        record.public = true;
        Ok(record.winner)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

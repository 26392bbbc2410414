//! Boundary events emitted by the router.
//!
//! Events carry handles and plaintext metadata only. A winner is never
//! exposed as plaintext or as an intermediate score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AgentId, EventId, Handle, Principal, Result, TicketId};

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouterEvent {
    /// An agent was upserted or deactivated.
    AgentChanged { agent_id: AgentId, active: bool },
    /// A ticket was routed. The off-chain decrypt flow starts from here.
    MatchRouted {
        ticket: TicketId,
        requester: Principal,
        winner: Handle,
    },
    /// The winner of a ticket was made publicly decryptable (dev only).
    MatchMadePublic { ticket: TicketId, winner: Handle },
    /// The second grantee for future routings changed.
    RouterPrincipalChanged {
        previous: Principal,
        current: Principal,
    },
    /// Administrative ownership moved to a new principal.
    OwnershipTransferred {
        previous: Principal,
        current: Principal,
    },
}

impl std::fmt::Display for RouterEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AgentChanged { .. } => write!(f, "AGENT_CHANGED"),
            Self::MatchRouted { .. } => write!(f, "MATCH_ROUTED"),
            Self::MatchMadePublic { .. } => write!(f, "MATCH_MADE_PUBLIC"),
            Self::RouterPrincipalChanged { .. } => write!(f, "ROUTER_PRINCIPAL_CHANGED"),
            Self::OwnershipTransferred { .. } => write!(f, "OWNERSHIP_TRANSFERRED"),
        }
    }
}

/// An event stamped for transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: EventId,
    pub emitted_at: DateTime<Utc>,
    pub event: RouterEvent,
}

impl EventEnvelope {
    #[must_use]
    pub fn new(event: RouterEvent) -> Self {
        Self {
            id: EventId::new(),
            emitted_at: Utc::now(),
            event,
        }
    }

    /// Wire form of the envelope.
    ///
    /// # Errors
    /// Returns `Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

//! Public transcript of a routing pass.
//!
//! Everything hashed here is already visible at the boundary: the ticket,
//! the requester, which agents were active (liveness is plaintext) and the
//! winner handle. Two observers of the same call compute the same digest.

use blindroute_types::{AgentId, Handle, Principal, TicketId, constants};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Receipt returned from a successful `route`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingReceipt {
    pub ticket: TicketId,
    pub requester: Principal,
    /// Agents scored, in index order.
    pub candidates_scored: Vec<AgentId>,
    /// Handle of the encrypted winner id.
    pub winner: Handle,
    pub digest: [u8; 32],
}

impl RoutingReceipt {
    #[must_use]
    pub fn new(
        ticket: TicketId,
        requester: Principal,
        candidates_scored: Vec<AgentId>,
        winner: Handle,
    ) -> Self {
        let digest = compute_receipt_digest(&ticket, &requester, &candidates_scored, &winner);
        Self {
            ticket,
            requester,
            candidates_scored,
            winner,
            digest,
        }
    }

    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

/// Hash the public routing transcript.
///
/// Candidate order matters: the same set in a different order is a
/// different transcript, since order decides ties.
#[must_use]
pub fn compute_receipt_digest(
    ticket: &TicketId,
    requester: &Principal,
    candidates: &[AgentId],
    winner: &Handle,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(constants::RECEIPT_DOMAIN);
    hasher.update(ticket.as_bytes());
    hasher.update(requester.as_bytes());
    hasher.update((candidates.len() as u64).to_le_bytes());
    for id in candidates {
        hasher.update(id.get().to_le_bytes());
    }
    hasher.update(winner.as_bytes());
    hasher.finalize().into()
}

/// Recompute the digest and compare.
#[must_use]
pub fn verify_receipt(receipt: &RoutingReceipt) -> bool {
    compute_receipt_digest(
        &receipt.ticket,
        &receipt.requester,
        &receipt.candidates_scored,
        &receipt.winner,
    ) == receipt.digest
}

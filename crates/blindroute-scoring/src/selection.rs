//! Encrypted argmax over the indexed agents.
//!
//! ```text
//! best_score ← enc(0); best_id ← enc(0)
//! for agent in index order:
//!     if !agent.active: continue            // plaintext metadata only
//!     s      ← score(need, urgency, agent.skill)
//!     better ← s > best_score               // encrypted
//!     best_score ← select(better, s, best_score)
//!     best_id    ← select(better, enc(agent.id), best_id)
//! ```
//!
//! The comparison is strict, so a later agent with an equal score never
//! displaces the incumbent.

use blindroute_fhe::{Euint16, Euint32, FheBackend};
use blindroute_registry::Agent;
use blindroute_types::{AgentId, BlindRouteError, Result, constants::SKILL_DIMS};

use crate::score_agent;

/// Ingested inputs for one routing call.
#[derive(Debug, Clone, Copy)]
pub struct RoutingQuery {
    pub need: [Euint16; SKILL_DIMS],
    pub urgency: Euint16,
}

/// Result of one argmax pass.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Encrypted id of the winning agent.
    pub winner: Euint32,
    /// Encrypted winning score. Never granted to anyone.
    pub best_score: Euint16,
    /// Agents that were scored, in order. Plaintext, public metadata.
    pub scored: Vec<AgentId>,
}

/// Run the encrypted argmax over `agents` (index order, holes included).
///
/// # Errors
/// - `NoActiveAgents` if no agent in `agents` is active; checked before any
///   homomorphic work
/// - any backend error, propagated unchanged
pub fn select_best<'a, B, I>(fhe: &mut B, query: &RoutingQuery, agents: I) -> Result<Selection>
where
    B: FheBackend,
    I: IntoIterator<Item = &'a Agent>,
{
    let indexed: Vec<&Agent> = agents.into_iter().collect();
    if !indexed.iter().any(|a| a.active) {
        return Err(BlindRouteError::NoActiveAgents);
    }

    let mut best_score = fhe.from_plain(0u16)?;
    let mut best_id = fhe.from_plain(0u32)?;
    let mut scored = Vec::with_capacity(indexed.len());

    for agent in indexed {
        if !agent.active {
            continue;
        }

        let score = score_agent(fhe, &query.need, &query.urgency, &agent.skill)?;
        let better = fhe.greater_than(&score, &best_score)?;
        best_score = fhe.select(&better, &score, &best_score)?;
        let candidate = fhe.from_plain(agent.id.get())?;
        best_id = fhe.select(&better, &candidate, &best_id)?;

        tracing::debug!(agent = %agent.id, "Candidate scored");
        scored.push(agent.id);
    }

    Ok(Selection {
        winner: best_id,
        best_score,
        scored,
    })
}

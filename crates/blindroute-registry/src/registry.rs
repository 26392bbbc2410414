//! Agent registry.
//!
//! Tracks encrypted skill profiles and liveness. All mutations are atomic:
//! capacity and liveness checks run before anything is written.

use std::collections::HashMap;

use blindroute_types::{AgentId, BlindRouteError, Result};

use crate::{ActiveIndex, Agent, SkillVector};

/// Effect of an upsert on an agent's liveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// inactive/new → active
    Activated,
    /// active → inactive
    Deactivated,
    /// Liveness unchanged; skills replaced.
    Updated,
}

/// Source of truth for agent profiles.
pub struct AgentRegistry {
    /// Every agent ever upserted. Never shrinks.
    agents: HashMap<AgentId, Agent>,
    /// Ever-activated ids in tie-break order.
    index: ActiveIndex,
    /// Currently active agents, holes excluded.
    active_count: usize,
}

impl AgentRegistry {
    /// Create an empty registry with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(blindroute_types::constants::MAX_AGENTS)
    }

    /// Create a registry whose index holds at most `max_agents` ids.
    #[must_use]
    pub fn with_capacity(max_agents: usize) -> Self {
        Self {
            agents: HashMap::new(),
            index: ActiveIndex::with_capacity(max_agents),
            active_count: 0,
        }
    }

    /// Replace an agent's skill vector and liveness flag.
    ///
    /// On a false→true transition the id takes an index slot (first
    /// activation only; reactivation reuses the old slot).
    ///
    /// # Errors
    /// Returns `CapacityExceeded` if activation needs a new slot and the
    /// index is full. Nothing is written in that case.
    pub fn upsert(&mut self, id: AgentId, skill: SkillVector, active: bool) -> Result<Transition> {
        let was_active = self.is_active(id);

        if active && !was_active {
            self.index.admit(id)?;
        }

        self.agents.insert(id, Agent::new(id, skill, active));

        let transition = match (was_active, active) {
            (false, true) => {
                self.active_count += 1;
                Transition::Activated
            }
            (true, false) => {
                self.active_count -= 1;
                Transition::Deactivated
            }
            _ => Transition::Updated,
        };

        tracing::debug!(
            agent = %id,
            active,
            ?transition,
            active_count = self.active_count,
            "Agent upserted"
        );
        Ok(transition)
    }

    /// Flip an active agent to inactive. Skill ciphertexts are retained.
    ///
    /// # Errors
    /// Returns `NotActive` if the agent is unknown or already inactive.
    pub fn deactivate(&mut self, id: AgentId) -> Result<()> {
        let agent = self
            .agents
            .get_mut(&id)
            .filter(|a| a.active)
            .ok_or(BlindRouteError::NotActive(id))?;
        agent.active = false;
        self.active_count -= 1;

        tracing::debug!(agent = %id, active_count = self.active_count, "Agent deactivated");
        Ok(())
    }

    /// Look up an agent, active or not.
    #[must_use]
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// Look up an agent, failing if it was never registered.
    pub fn get(&self, id: AgentId) -> Result<&Agent> {
        self.agent(id).ok_or(BlindRouteError::AgentNotFound(id))
    }

    #[must_use]
    pub fn is_active(&self, id: AgentId) -> bool {
        self.agents.get(&id).is_some_and(|a| a.active)
    }

    /// Number of currently active agents.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Raw index length, holes included.
    #[must_use]
    pub fn index_len(&self) -> usize {
        self.index.len()
    }

    /// Number of agents ever registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.index.capacity()
    }

    /// Every indexed agent in tie-break order, holes included.
    pub fn indexed(&self) -> impl Iterator<Item = &Agent> {
        self.index.iter().filter_map(|id| self.agents.get(id))
    }

    /// Active agents only, in tie-break order.
    pub fn candidates(&self) -> impl Iterator<Item = &Agent> {
        self.indexed().filter(|a| a.active)
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//! Bounded append-only index of activated agents.
//!
//! Ids are appended the first time an agent is activated and never removed.
//! Position in the index is the routing tie-break order, so an agent that is
//! deactivated and later reactivated keeps its original slot.

use std::collections::HashSet;

use blindroute_types::{AgentId, BlindRouteError, Result, constants};

/// Insertion-ordered set of every agent id that has ever been active.
#[derive(Debug, Clone)]
pub struct ActiveIndex {
    /// Ids in first-activation order.
    ids: Vec<AgentId>,
    /// Membership mirror of `ids`.
    members: HashSet<AgentId>,
    /// Maximum number of ids before the index is full.
    max_agents: usize,
}

impl ActiveIndex {
    /// Create an empty index with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(constants::MAX_AGENTS)
    }

    /// Create an index with a custom capacity.
    #[must_use]
    pub fn with_capacity(max_agents: usize) -> Self {
        Self {
            ids: Vec::with_capacity(max_agents),
            members: HashSet::with_capacity(max_agents),
            max_agents,
        }
    }

    /// Check that `id` can be admitted without mutating anything.
    ///
    /// # Errors
    /// Returns `CapacityExceeded` if `id` is new and the index is full.
    pub fn check_admit(&self, id: AgentId) -> Result<()> {
        if !self.members.contains(&id) && self.ids.len() >= self.max_agents {
            return Err(BlindRouteError::CapacityExceeded {
                max: self.max_agents,
            });
        }
        Ok(())
    }

    /// Append `id` unless it already holds a slot.
    ///
    /// Returns `true` if a new slot was taken.
    ///
    /// # Errors
    /// Returns `CapacityExceeded` if `id` is new and the index is full.
    pub fn admit(&mut self, id: AgentId) -> Result<bool> {
        self.check_admit(id)?;
        if !self.members.insert(id) {
            return Ok(false);
        }
        self.ids.push(id);
        Ok(true)
    }

    #[must_use]
    pub fn contains(&self, id: &AgentId) -> bool {
        self.members.contains(id)
    }

    /// Ids in index order, holes included.
    pub fn iter(&self) -> impl Iterator<Item = &AgentId> {
        self.ids.iter()
    }

    /// Raw slot count, holes included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_agents
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.ids.len() >= self.max_agents
    }
}

impl Default for ActiveIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> AgentId {
        AgentId::new(n).unwrap()
    }

    #[test]
    fn admit_preserves_order() {
        let mut index = ActiveIndex::new();
        for n in [5, 2, 9] {
            assert!(index.admit(id(n)).unwrap());
        }
        let order: Vec<u32> = index.iter().map(|a| a.get()).collect();
        assert_eq!(order, vec![5, 2, 9]);
    }

    #[test]
    fn readmit_keeps_original_slot() {
        let mut index = ActiveIndex::new();
        index.admit(id(1)).unwrap();
        index.admit(id(2)).unwrap();
        assert!(!index.admit(id(1)).unwrap());
        assert_eq!(index.len(), 2);
        assert_eq!(index.iter().next().copied(), Some(id(1)));
    }

    #[test]
    fn full_index_rejects_new_ids() {
        let mut index = ActiveIndex::with_capacity(2);
        index.admit(id(1)).unwrap();
        index.admit(id(2)).unwrap();
        assert!(index.is_full());
        let err = index.admit(id(3)).unwrap_err();
        assert!(matches!(err, BlindRouteError::CapacityExceeded { max: 2 }));
        assert_eq!(index.len(), 2);
        assert!(!index.contains(&id(3)));
    }

    #[test]
    fn full_index_still_readmits_members() {
        let mut index = ActiveIndex::with_capacity(1);
        index.admit(id(1)).unwrap();
        assert!(index.check_admit(id(1)).is_ok());
        assert!(!index.admit(id(1)).unwrap());
    }

    #[test]
    fn default_capacity() {
        let index = ActiveIndex::default();
        assert_eq!(index.capacity(), 2000);
        assert!(index.is_empty());
    }
}

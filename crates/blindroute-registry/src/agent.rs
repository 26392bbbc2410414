//! The agent record.

use blindroute_fhe::Euint16;
use blindroute_types::{AgentId, constants::SKILL_DIMS};
use serde::{Deserialize, Serialize};

/// Exactly [`SKILL_DIMS`] encrypted skill levels. The array type is the
/// length invariant.
pub type SkillVector = [Euint16; SKILL_DIMS];

/// A registered agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub skill: SkillVector,
    /// Plaintext liveness. The only thing routing may branch on.
    pub active: bool,
}

impl Agent {
    #[must_use]
    pub fn new(id: AgentId, skill: SkillVector, active: bool) -> Self {
        Self { id, skill, active }
    }
}

//! # blindroute-registry
//!
//! **Agent Registry** for BlindRoute.
//!
//! Stores one encrypted skill profile per agent plus a plaintext liveness
//! flag. Agents are never erased: deactivation flips the flag and leaves
//! the ciphertexts in place.
//!
//! ## Layout
//!
//! ```text
//! agents:  AgentId → Agent { skill: [Euint16; 4], active }
//! index:   [a1, a2, a3, ...]   append-only, first-activation order, ≤ MAX_AGENTS
//! ```
//!
//! Deactivated agents stay in the index as holes. Iteration goes through
//! [`AgentRegistry::indexed`] and the scoring engine skips holes by
//! checking `active`.

pub mod active_index;
pub mod agent;
pub mod registry;

pub use active_index::ActiveIndex;
pub use agent::{Agent, SkillVector};
pub use registry::{AgentRegistry, Transition};

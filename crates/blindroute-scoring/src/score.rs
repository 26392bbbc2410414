//! Per-agent encrypted score.
//!
//! ```text
//! overlap = Σ_k min(need[k], skill[k])
//! score   = overlap + min(overlap, urgency)
//! ```
//!
//! Urgency can at most double the overlap. All sums run in the 16-bit ring
//! and wrap on overflow, exactly as the backend's `add` does.

use blindroute_fhe::{Euint16, FheBackend};
use blindroute_types::{Result, constants::SKILL_DIMS};

/// Score one skill profile against a need profile.
pub fn score_agent<B: FheBackend>(
    fhe: &mut B,
    need: &[Euint16; SKILL_DIMS],
    urgency: &Euint16,
    skill: &[Euint16; SKILL_DIMS],
) -> Result<Euint16> {
    let mut overlap = fhe.min(&need[0], &skill[0])?;
    for (n, s) in need.iter().zip(skill).skip(1) {
        let dim = fhe.min(n, s)?;
        overlap = fhe.add(&overlap, &dim)?;
    }
    let bonus = fhe.min(&overlap, urgency)?;
    fhe.add(&overlap, &bonus)
}

//! System-wide constants for the BlindRoute router.

/// Hard ceiling on the active-agent index.
///
/// Every routing call scores each indexed agent homomorphically, so this
/// bound is also the worst-case cost of one routing call.
pub const MAX_AGENTS: usize = 2000;

/// Number of skill / need dimensions per profile.
pub const SKILL_DIMS: usize = 4;

/// Bit width of skills, needs, urgency and scores.
pub const SCORE_BITS: u32 = 16;

/// Bit width of encrypted agent identifiers.
pub const AGENT_ID_BITS: u32 = 32;

/// Domain separator for ciphertext handle derivation.
pub const HANDLE_DOMAIN: &[u8] = b"blindroute:handle:v1:";

/// Domain separator for input proof digests.
pub const INPUT_PROOF_DOMAIN: &[u8] = b"blindroute:input_proof:v1:";

/// Domain separator for routing receipt digests.
pub const RECEIPT_DOMAIN: &[u8] = b"blindroute:receipt:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "BlindRoute";

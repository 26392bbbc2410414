//! Error types for the BlindRoute router.
//!
//! All errors use the `BR_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Ciphertext ingestion errors
//! - 2xx: Agent registry errors
//! - 3xx: Routing / match ledger errors
//! - 4xx: Access control errors
//! - 9xx: General / internal errors
//!
//! Every variant is terminal for the call that raised it. Callers match on
//! the variant (re-batch a proof, pick a new ticket id, ...), so variants are
//! never collapsed into a generic failure.

use thiserror::Error;

use crate::{AgentId, Handle, Principal, TicketId};

/// Central error enum for all BlindRoute operations.
#[derive(Debug, Error)]
pub enum BlindRouteError {
    // =================================================================
    // Ingestion Errors (1xx)
    // =================================================================
    /// The input proof does not attest the batch holding this ciphertext.
    #[error("BR_ERR_100: Input proof does not attest ciphertext {handle}")]
    ProofMismatch { handle: Handle },

    /// The ciphertext encrypts a different width than the one requested.
    #[error("BR_ERR_101: Ciphertext kind mismatch: expected {expected}, got {actual}")]
    CiphertextKindMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// The backend has never issued this handle.
    #[error("BR_ERR_102: Unknown ciphertext handle {0}")]
    UnknownHandle(Handle),

    // =================================================================
    // Registry Errors (2xx)
    // =================================================================
    /// Agent identifier zero is reserved.
    #[error("BR_ERR_200: Agent id must be non-zero")]
    InvalidAgentId,

    /// The active-agent index is full.
    #[error("BR_ERR_201: Active agent capacity exceeded (max {max})")]
    CapacityExceeded { max: usize },

    /// Deactivation of an agent that is not currently active.
    #[error("BR_ERR_202: Agent not active: {0}")]
    NotActive(AgentId),

    /// The agent has never been registered.
    #[error("BR_ERR_203: Agent not found: {0}")]
    AgentNotFound(AgentId),

    // =================================================================
    // Routing / Ledger Errors (3xx)
    // =================================================================
    /// Routing attempted while no agent is active.
    #[error("BR_ERR_300: No active agents")]
    NoActiveAgents,

    /// A match for this ticket was already finalized.
    #[error("BR_ERR_301: Ticket already exists: {0}")]
    TicketAlreadyExists(TicketId),

    /// No match was ever finalized for this ticket.
    #[error("BR_ERR_302: No match for ticket: {0}")]
    NoMatch(TicketId),

    // =================================================================
    // Access Errors (4xx)
    // =================================================================
    /// Administrative call from a principal other than the owner.
    #[error("BR_ERR_400: Unauthorized caller: {0}")]
    Unauthorized(Principal),

    /// The decrypt service refused: no grant and not public.
    #[error("BR_ERR_401: Decryption denied for {principal} on {handle}")]
    DecryptionDenied { handle: Handle, principal: Principal },

    /// A development-only path was called on a production router.
    #[error("BR_ERR_402: Development path disabled: {operation}")]
    DevModeDisabled { operation: &'static str },

    /// The ed25519 signature on an administrative request didn't verify.
    #[error("BR_ERR_403: Invalid caller signature")]
    InvalidSignature,

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("BR_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("BR_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, out-of-range limits, etc.).
    #[error("BR_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, BlindRouteError>;

impl From<serde_json::Error> for BlindRouteError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

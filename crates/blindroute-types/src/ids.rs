//! Identifiers used throughout BlindRoute.
//!
//! Agent ids are small plaintext integers chosen by the operator. Ticket ids
//! are opaque 32-byte keys chosen by the requester. Principals are raw
//! ed25519 public keys, and handles are 32-byte references to ciphertexts
//! held by the encrypted backend.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{BlindRouteError, Result};

// ---------------------------------------------------------------------------
// AgentId
// ---------------------------------------------------------------------------

/// Non-zero 32-bit agent identifier.
///
/// Zero is reserved: the encrypted argmax starts from an encrypted `0`, so a
/// decrypted winner of `0` means "no agent beat the initial score".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct AgentId(u32);

impl AgentId {
    /// Wrap a raw identifier.
    ///
    /// # Errors
    /// Returns [`BlindRouteError::InvalidAgentId`] if `raw` is zero.
    pub fn new(raw: u32) -> Result<Self> {
        if raw == 0 {
            return Err(BlindRouteError::InvalidAgentId);
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for AgentId {
    type Error = BlindRouteError;

    fn try_from(raw: u32) -> Result<Self> {
        Self::new(raw)
    }
}

impl From<AgentId> for u32 {
    fn from(id: AgentId) -> Self {
        id.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// TicketId
// ---------------------------------------------------------------------------

/// Requester-chosen routing key. Each ticket can be routed at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TicketId(pub [u8; 32]);

impl TicketId {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive a ticket id from an arbitrary label (e.g. a client request id).
    #[must_use]
    pub fn from_label(label: impl AsRef<[u8]>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"blindroute:ticket:v1:");
        hasher.update(label.as_ref());
        Self(hasher.finalize().into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ticket:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// Principal
// ---------------------------------------------------------------------------

/// An account that can call the router or hold decrypt capabilities.
/// This is the raw ed25519 public key (32 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Principal(pub [u8; 32]);

impl Principal {
    #[must_use]
    pub fn from_pubkey(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<&ed25519_dalek::VerifyingKey> for Principal {
    fn from(key: &ed25519_dalek::VerifyingKey) -> Self {
        Self(key.to_bytes())
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "principal:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Opaque reference to a ciphertext. Safe to publish: it reveals no plaintext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Handle(pub [u8; 32]);

impl Handle {
    /// The "absent" handle returned by read accessors for unknown keys.
    pub const ZERO: Self = Self([0u8; 32]);

    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// EventId
// ---------------------------------------------------------------------------

/// Unique identifier for a boundary event. Uses UUIDv7 for time-ordered sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "evt:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

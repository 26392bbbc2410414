//! Client-side ciphertext inputs and the proofs that attest them.
//!
//! A client encrypts all values for one call as a single batch and receives
//! one [`InputProof`] covering it. Every ciphertext consumed by a routing or
//! upsert call must be attested by that same proof.

use blindroute_types::{Handle, Principal, constants};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ValueKind;

/// A ciphertext as submitted by a client, before ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalCiphertext {
    pub handle: Handle,
    pub kind: ValueKind,
}

/// Attestation over one batch of client ciphertexts.
///
/// The digest commits to the submitter, a per-batch nonce chosen by the
/// attesting backend and the ordered handle list. A proof cannot be
/// stretched over ciphertexts from another batch, and a third party cannot
/// rebuild an attested proof without the nonce the backend drew.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputProof {
    /// The principal that encrypted the batch.
    pub submitter: Principal,
    /// Handles covered by this proof, in submission order.
    pub handles: Vec<Handle>,
    /// Backend-drawn randomness, unique per batch.
    pub nonce: [u8; 32],
    /// `SHA-256(domain || submitter || nonce || count || handles...)`.
    pub digest: [u8; 32],
}

impl InputProof {
    /// Build a proof over `handles` for `submitter` under `nonce`.
    #[must_use]
    pub fn new(submitter: Principal, handles: Vec<Handle>, nonce: [u8; 32]) -> Self {
        let digest = Self::compute_digest(&submitter, nonce, &handles);
        Self {
            submitter,
            handles,
            nonce,
            digest,
        }
    }

    /// Compute the commitment over a batch.
    #[must_use]
    pub fn compute_digest(submitter: &Principal, nonce: [u8; 32], handles: &[Handle]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(constants::INPUT_PROOF_DOMAIN);
        hasher.update(submitter.as_bytes());
        hasher.update(nonce);
        hasher.update((handles.len() as u64).to_le_bytes());
        for handle in handles {
            hasher.update(handle.as_bytes());
        }
        hasher.finalize().into()
    }

    /// Whether the digest matches the contents.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        Self::compute_digest(&self.submitter, self.nonce, &self.handles) == self.digest
    }

    /// Whether `handle` belongs to the attested batch.
    #[must_use]
    pub fn attests(&self, handle: &Handle) -> bool {
        self.handles.contains(handle)
    }
}

/// A plaintext the client wants encrypted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputValue {
    Bool(bool),
    U16(u16),
    U32(u32),
}

impl InputValue {
    #[must_use]
    pub fn kind(self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::U16(_) => ValueKind::U16,
            Self::U32(_) => ValueKind::U32,
        }
    }

    #[must_use]
    pub fn word(self) -> u64 {
        match self {
            Self::Bool(b) => u64::from(b),
            Self::U16(v) => u64::from(v),
            Self::U32(v) => u64::from(v),
        }
    }
}

impl From<bool> for InputValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u16> for InputValue {
    fn from(v: u16) -> Self {
        Self::U16(v)
    }
}

impl From<u32> for InputValue {
    fn from(v: u32) -> Self {
        Self::U32(v)
    }
}

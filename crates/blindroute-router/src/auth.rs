//! Caller authentication for the administrative surface.
//!
//! A [`CallerContext`] is either built from an ed25519 signature the router
//! verifies itself, or handed in by a host that already authenticated the
//! caller. Either way the router only ever sees the resulting [`Principal`].

use blindroute_types::{AgentId, BlindRouteError, Principal, Result, TicketId};
use ed25519_dalek::{Signature, VerifyingKey};
use serde::{Deserialize, Serialize};

/// Authenticated identity of the party making a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerContext {
    principal: Principal,
}

impl CallerContext {
    /// Accept a principal the host has already authenticated.
    #[must_use]
    pub fn trusted(principal: Principal) -> Self {
        Self { principal }
    }

    /// Verify `signature` over `message` and bind the caller to `key`.
    ///
    /// # Errors
    /// Returns `InvalidSignature` if verification fails.
    pub fn verified(key: &VerifyingKey, message: &[u8], signature: &Signature) -> Result<Self> {
        key.verify_strict(message, signature)
            .map_err(|_| BlindRouteError::InvalidSignature)?;
        Ok(Self {
            principal: Principal::from(key),
        })
    }

    #[must_use]
    pub fn principal(&self) -> Principal {
        self.principal
    }
}

/// An administrative action, in the form a client signs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AdminAction {
    UpsertAgent { agent_id: AgentId, active: bool },
    DeactivateAgent { agent_id: AgentId },
    SetRouterPrincipal { principal: Principal },
    TransferOwnership { new_owner: Principal },
    ForcePublic { ticket: TicketId },
}

impl AdminAction {
    /// Canonical signing payload.
    ///
    /// Format: `"blindroute:admin:v1:" || tag || fields || nonce`
    #[must_use]
    pub fn signing_payload(&self, nonce: u64) -> Vec<u8> {
        let mut payload = Vec::with_capacity(96);
        payload.extend_from_slice(b"blindroute:admin:v1:");
        match self {
            Self::UpsertAgent { agent_id, active } => {
                payload.push(1);
                payload.extend_from_slice(&agent_id.get().to_le_bytes());
                payload.push(u8::from(*active));
            }
            Self::DeactivateAgent { agent_id } => {
                payload.push(2);
                payload.extend_from_slice(&agent_id.get().to_le_bytes());
            }
            Self::SetRouterPrincipal { principal } => {
                payload.push(3);
                payload.extend_from_slice(principal.as_bytes());
            }
            Self::TransferOwnership { new_owner } => {
                payload.push(4);
                payload.extend_from_slice(new_owner.as_bytes());
            }
            Self::ForcePublic { ticket } => {
                payload.push(5);
                payload.extend_from_slice(ticket.as_bytes());
            }
        }
        payload.extend_from_slice(&nonce.to_le_bytes());
        payload
    }
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::{Signer, SigningKey};
    use rand::rngs::OsRng;

    use super::*;

    fn action() -> AdminAction {
        AdminAction::DeactivateAgent {
            agent_id: AgentId::new(3).unwrap(),
        }
    }

    #[test]
    fn verified_binds_principal_to_key() {
        let key = SigningKey::generate(&mut OsRng);
        let msg = action().signing_payload(1);
        let sig = key.sign(&msg);
        let caller = CallerContext::verified(&key.verifying_key(), &msg, &sig)
            .unwrap();
        assert_eq!(
            caller.principal(),
            Principal::from_pubkey(key.verifying_key().to_bytes())
        );
    }

    #[test]
    fn wrong_message_rejected() {
        let key = SigningKey::generate(&mut OsRng);
        let sig = key.sign(&action().signing_payload(1));
        let err = CallerContext::verified(&key.verifying_key(), &action().signing_payload(2), &sig)
            .unwrap_err();
        assert!(matches!(err, BlindRouteError::InvalidSignature));
    }

    #[test]
    fn wrong_key_rejected() {
        let signer = SigningKey::generate(&mut OsRng);
        let other = SigningKey::generate(&mut OsRng);
        let msg = action().signing_payload(7);
        let sig = signer.sign(&msg);
        assert!(CallerContext::verified(&other.verifying_key(), &msg, &sig).is_err());
    }

    #[test]
    fn payload_binds_action_and_nonce() {
        let a = action().signing_payload(1);
        assert_eq!(a, action().signing_payload(1));
        assert_ne!(a, action().signing_payload(2));
        let b = AdminAction::UpsertAgent {
            agent_id: AgentId::new(3).unwrap(),
            active: false,
        }
        .signing_payload(1);
        assert_ne!(a, b);
    }

    #[test]
    fn trusted_passes_through() {
        let p = Principal([9u8; 32]);
        assert_eq!(CallerContext::trusted(p).principal(), p);
    }
}

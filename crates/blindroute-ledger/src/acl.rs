//! Decrypt-capability ACL.
//!
//! Grants are monotonic: a principal once granted on a handle stays granted,
//! and a handle once public stays public. There is no revoke.

use std::collections::{BTreeSet, HashMap, HashSet};

use blindroute_fhe::{AccessPolicy, Encrypted, FheType};
use blindroute_types::{Handle, Principal};

/// Per-handle grants plus a global public set.
#[derive(Debug, Default)]
pub struct AclManager {
    grants: HashMap<Handle, BTreeSet<Principal>>,
    public: HashSet<Handle>,
}

impl AclManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `principal` the right to decrypt `handle`.
    ///
    /// Returns `false` if the grant already existed.
    pub fn grant(&mut self, handle: Handle, principal: Principal) -> bool {
        let added = self.grants.entry(handle).or_default().insert(principal);
        if added {
            tracing::debug!(%handle, principal = %principal, "Decrypt grant added");
        }
        added
    }

    /// Typed convenience over [`AclManager::grant`].
    pub fn grant_value<T: FheType>(&mut self, value: &Encrypted<T>, principal: Principal) -> bool {
        self.grant(value.handle(), principal)
    }

    /// Make `handle` decryptable by anyone. Returns `false` if it already was.
    pub fn make_public(&mut self, handle: Handle) -> bool {
        self.public.insert(handle)
    }

    #[must_use]
    pub fn is_public(&self, handle: &Handle) -> bool {
        self.public.contains(handle)
    }

    /// Whether `principal` holds an explicit grant on `handle`.
    #[must_use]
    pub fn is_granted(&self, handle: &Handle, principal: &Principal) -> bool {
        self.grants
            .get(handle)
            .is_some_and(|set| set.contains(principal))
    }

    /// Explicit grantees of `handle`, sorted. Empty if none.
    #[must_use]
    pub fn grantees(&self, handle: &Handle) -> Vec<Principal> {
        self.grants
            .get(handle)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }
}

impl AccessPolicy for AclManager {
    fn may_decrypt(&self, handle: &Handle, principal: &Principal) -> bool {
        self.is_public(handle) || self.is_granted(handle, principal)
    }
}

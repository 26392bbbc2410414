//! Mock homomorphic backend for development and tests.
//!
//! Keeps each plaintext word in a private table keyed by a SHA-256 derived
//! handle. Values are only observable through the [`DecryptionOracle`]
//! (ACL-checked) or the test-only `reveal` helper. This is **not** a
//! cryptosystem.
//!
//! Numeric semantics mirror TFHE-style fixed-width integers: `add` wraps
//! modulo `2^BITS`, `min` and `greater_than` are exact.

use std::collections::{HashMap, HashSet};

use blindroute_types::{BlindRouteError, Handle, Principal, Result, constants};
use sha2::{Digest, Sha256};

use crate::{
    AccessPolicy, DecryptionOracle, Ebool, Encrypted, ExternalCiphertext, FheBackend, FheType,
    FheUint, InputProof, InputValue, ValueKind,
};

#[derive(Debug, Clone, Copy)]
struct Slot {
    kind: ValueKind,
    word: u64,
}

/// In-memory stand-in for a homomorphic coprocessor.
#[derive(Debug, Default)]
pub struct MockBackend {
    /// Plaintext words keyed by handle.
    values: HashMap<Handle, Slot>,
    /// Digests of input proofs issued by `encrypt_inputs`.
    issued_proofs: HashSet<[u8; 32]>,
    /// Monotonic counter feeding handle derivation.
    next_handle: u64,
    /// Number of homomorphic operations evaluated (add/min/gt/select).
    ops: u64,
}

impl MockBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Client side: encrypt a batch and attest it with one proof.
    pub fn encrypt_inputs(
        &mut self,
        submitter: Principal,
        values: &[InputValue],
    ) -> (Vec<ExternalCiphertext>, InputProof) {
        let ciphertexts: Vec<ExternalCiphertext> = values
            .iter()
            .map(|v| ExternalCiphertext {
                handle: self.mint(v.kind(), v.word()),
                kind: v.kind(),
            })
            .collect();
        let nonce: [u8; 32] = rand::random();
        let proof = InputProof::new(
            submitter,
            ciphertexts.iter().map(|c| c.handle).collect(),
            nonce,
        );
        self.issued_proofs.insert(proof.digest);
        (ciphertexts, proof)
    }

    /// Number of ciphertexts held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Homomorphic operations evaluated so far.
    #[must_use]
    pub fn op_count(&self) -> u64 {
        self.ops
    }

    fn mint(&mut self, kind: ValueKind, word: u64) -> Handle {
        let mut hasher = Sha256::new();
        hasher.update(constants::HANDLE_DOMAIN);
        hasher.update(self.next_handle.to_le_bytes());
        hasher.update([kind.tag()]);
        let handle = Handle(hasher.finalize().into());
        self.next_handle += 1;
        self.values.insert(handle, Slot { kind, word });
        handle
    }

    fn load<T: FheType>(&self, value: &Encrypted<T>) -> Result<u64> {
        let handle = value.handle();
        let slot = self
            .values
            .get(&handle)
            .ok_or(BlindRouteError::UnknownHandle(handle))?;
        if slot.kind != T::KIND {
            return Err(BlindRouteError::CiphertextKindMismatch {
                expected: T::KIND.name(),
                actual: slot.kind.name(),
            });
        }
        Ok(slot.word)
    }

    fn emit<T: FheType>(&mut self, word: u64) -> Encrypted<T> {
        self.ops += 1;
        Encrypted::wrap(self.mint(T::KIND, word))
    }
}

impl FheBackend for MockBackend {
    fn ingest<T: FheType>(
        &mut self,
        ciphertext: &ExternalCiphertext,
        proof: &InputProof,
    ) -> Result<Encrypted<T>> {
        let handle = ciphertext.handle;
        if !proof.is_consistent()
            || !self.issued_proofs.contains(&proof.digest)
            || !proof.attests(&handle)
        {
            return Err(BlindRouteError::ProofMismatch { handle });
        }
        if ciphertext.kind != T::KIND {
            return Err(BlindRouteError::CiphertextKindMismatch {
                expected: T::KIND.name(),
                actual: ciphertext.kind.name(),
            });
        }
        let value = Encrypted::wrap(handle);
        // The declared kind must agree with what was actually encrypted.
        self.load(&value)?;
        Ok(value)
    }

    fn from_plain<T: FheUint>(&mut self, value: T) -> Result<Encrypted<T>> {
        Ok(Encrypted::wrap(self.mint(T::KIND, value.to_word())))
    }

    fn add<T: FheUint>(&mut self, a: &Encrypted<T>, b: &Encrypted<T>) -> Result<Encrypted<T>> {
        let sum = self.load(a)?.wrapping_add(self.load(b)?) & T::mask();
        Ok(self.emit(sum))
    }

    fn min<T: FheUint>(&mut self, a: &Encrypted<T>, b: &Encrypted<T>) -> Result<Encrypted<T>> {
        let m = self.load(a)?.min(self.load(b)?);
        Ok(self.emit(m))
    }

    fn greater_than<T: FheUint>(&mut self, a: &Encrypted<T>, b: &Encrypted<T>) -> Result<Ebool> {
        let gt = self.load(a)? > self.load(b)?;
        Ok(self.emit(u64::from(gt)))
    }

    fn select<T: FheType>(
        &mut self,
        cond: &Ebool,
        if_true: &Encrypted<T>,
        if_false: &Encrypted<T>,
    ) -> Result<Encrypted<T>> {
        let c = self.load(cond)?;
        let t = self.load(if_true)?;
        let f = self.load(if_false)?;
        // Bitwise mux over both operands: c ∈ {0, 1}.
        let mask = 0u64.wrapping_sub(c & 1);
        Ok(self.emit((t & mask) | (f & !mask)))
    }
}

impl DecryptionOracle for MockBackend {
    fn decrypt<T: FheType, P: AccessPolicy + ?Sized>(
        &self,
        value: &Encrypted<T>,
        principal: &Principal,
        policy: &P,
    ) -> Result<T> {
        let handle = value.handle();
        if !policy.may_decrypt(&handle, principal) {
            tracing::warn!(
                handle = %handle,
                principal = %principal,
                "Decryption denied: no capability grant"
            );
            return Err(BlindRouteError::DecryptionDenied {
                handle,
                principal: *principal,
            });
        }
        Ok(T::from_word(self.load(value)?))
    }
}

/// Plaintext access without ACL. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl MockBackend {
    /// Read the plaintext behind any handle this backend issued.
    pub fn reveal<T: FheType>(&self, value: &Encrypted<T>) -> Result<T> {
        Ok(T::from_word(self.load(value)?))
    }
}

//! The homomorphic backend contract.
//!
//! The router depends only on these traits. A production deployment plugs
//! in an audited cryptosystem; tests and development use
//! [`MockBackend`](crate::MockBackend).

use blindroute_types::{BlindRouteError, Handle, Principal, Result};

use crate::{Ebool, Encrypted, ExternalCiphertext, FheType, FheUint, InputProof};

/// Homomorphic operations over typed handles.
///
/// Every operation returns a fresh handle and leaves its operands valid.
/// Arithmetic follows the fixed-width ring of the operand type and never
/// traps on overflow.
pub trait FheBackend {
    /// Accept an attested client ciphertext as a typed handle.
    ///
    /// # Errors
    /// - `ProofMismatch` if `proof` does not attest `ciphertext`
    /// - `CiphertextKindMismatch` if the ciphertext is not a `T`
    fn ingest<T: FheType>(
        &mut self,
        ciphertext: &ExternalCiphertext,
        proof: &InputProof,
    ) -> Result<Encrypted<T>>;

    /// Encrypt a known constant. Development and test paths only.
    fn from_plain<T: FheUint>(&mut self, value: T) -> Result<Encrypted<T>>;

    /// `a + b mod 2^BITS`.
    fn add<T: FheUint>(&mut self, a: &Encrypted<T>, b: &Encrypted<T>) -> Result<Encrypted<T>>;

    /// `min(a, b)`.
    fn min<T: FheUint>(&mut self, a: &Encrypted<T>, b: &Encrypted<T>) -> Result<Encrypted<T>>;

    /// Strict `a > b`, encrypted.
    fn greater_than<T: FheUint>(&mut self, a: &Encrypted<T>, b: &Encrypted<T>) -> Result<Ebool>;

    /// `cond ? if_true : if_false`, resolved inside the backend.
    fn select<T: FheType>(
        &mut self,
        cond: &Ebool,
        if_true: &Encrypted<T>,
        if_false: &Encrypted<T>,
    ) -> Result<Encrypted<T>>;

    /// Ingest a fixed-size group of ciphertexts under one proof.
    ///
    /// Either every ciphertext is ingested or the call fails.
    fn ingest_all<T: FheType, const N: usize>(
        &mut self,
        ciphertexts: &[ExternalCiphertext; N],
        proof: &InputProof,
    ) -> Result<[Encrypted<T>; N]> {
        let mut out = Vec::with_capacity(N);
        for ciphertext in ciphertexts {
            out.push(self.ingest::<T>(ciphertext, proof)?);
        }
        out.try_into()
            .map_err(|_| BlindRouteError::Internal("ingest_all length mismatch".into()))
    }
}

/// Who may recover which plaintext.
pub trait AccessPolicy {
    fn may_decrypt(&self, handle: &Handle, principal: &Principal) -> bool;
}

/// The off-boundary decrypt service.
pub trait DecryptionOracle {
    /// Return the plaintext behind `value` if `policy` grants `principal`.
    ///
    /// # Errors
    /// Returns `DecryptionDenied` when the policy refuses.
    fn decrypt<T: FheType, P: AccessPolicy + ?Sized>(
        &self,
        value: &Encrypted<T>,
        principal: &Principal,
        policy: &P,
    ) -> Result<T>;
}

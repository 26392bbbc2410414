//! # blindroute-fhe
//!
//! **Encrypted Value Abstraction** for BlindRoute.
//!
//! The router never sees plaintext. Everything it computes flows through
//! typed handles ([`Euint16`], [`Euint32`], [`Ebool`]) and the narrow
//! [`FheBackend`] trait:
//!
//! - `ingest`: attested external ciphertext → typed handle
//! - `from_plain`: constant → typed handle (development paths only)
//! - `add`, `min`: fixed-width ring arithmetic, wrapping modulo 2^N
//! - `greater_than`: encrypted predicate → [`Ebool`]
//! - `select`: branch-free conditional over two computed operands
//!
//! [`Ebool`] has no plaintext accessor, so no code path outside a backend
//! can branch on an encrypted condition.
//!
//! [`MockBackend`] is a development cryptosystem that keeps plaintexts in a
//! private handle table. It is a stand-in for an audited homomorphic library.

pub mod backend;
pub mod encrypted;
pub mod input;
pub mod mock;

pub use backend::{AccessPolicy, DecryptionOracle, FheBackend};
pub use encrypted::{Ebool, Encrypted, Euint16, Euint32, FheType, FheUint, ValueKind};
pub use input::{ExternalCiphertext, InputProof, InputValue};
pub use mock::MockBackend;

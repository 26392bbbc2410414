//! Typed ciphertext handles.
//!
//! An [`Encrypted<T>`] is a [`Handle`] tagged with the plaintext type it
//! encrypts. Handles are immutable: every homomorphic operation returns a
//! new one and leaves its operands valid.

use std::{fmt, marker::PhantomData};

use blindroute_types::{Handle, constants};
use serde::{Deserialize, Serialize};

/// Plaintext kind behind a ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Bool,
    U16,
    U32,
}

impl ValueKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "ebool",
            Self::U16 => "euint16",
            Self::U32 => "euint32",
        }
    }

    /// Tag byte mixed into handle derivation.
    #[must_use]
    pub fn tag(self) -> u8 {
        match self {
            Self::Bool => 0,
            Self::U16 => 1,
            Self::U32 => 2,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for bool {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
}

/// A plaintext type that can live under encryption.
///
/// Sealed: the set of encrypted kinds is fixed by the backend contract.
pub trait FheType: sealed::Sealed + Copy + fmt::Debug + Send + Sync + 'static {
    const KIND: ValueKind;

    /// Embed into the backend's machine word.
    fn to_word(self) -> u64;

    /// Recover from a machine word. Bits above the type's width are dropped.
    fn from_word(word: u64) -> Self;
}

/// An unsigned fixed-width integer kind. Arithmetic wraps modulo `2^BITS`.
pub trait FheUint: FheType {
    const BITS: u32;

    /// All-ones mask for this width.
    #[must_use]
    fn mask() -> u64 {
        (1u64 << Self::BITS) - 1
    }
}

impl FheType for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn to_word(self) -> u64 {
        u64::from(self)
    }

    fn from_word(word: u64) -> Self {
        word & 1 == 1
    }
}

impl FheType for u16 {
    const KIND: ValueKind = ValueKind::U16;

    fn to_word(self) -> u64 {
        u64::from(self)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_word(word: u64) -> Self {
        word as u16
    }
}

impl FheUint for u16 {
    const BITS: u32 = constants::SCORE_BITS;
}

impl FheType for u32 {
    const KIND: ValueKind = ValueKind::U32;

    fn to_word(self) -> u64 {
        u64::from(self)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_word(word: u64) -> Self {
        word as u32
    }
}

impl FheUint for u32 {
    const BITS: u32 = constants::AGENT_ID_BITS;
}

/// Opaque handle to an encrypted `T`.
///
/// Exposes only its [`Handle`]. There is deliberately no accessor that
/// yields the plaintext.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Encrypted<T: FheType> {
    handle: Handle,
    #[serde(skip)]
    _kind: PhantomData<fn() -> T>,
}

/// Encrypted 16-bit unsigned integer (skills, needs, urgency, scores).
pub type Euint16 = Encrypted<u16>;
/// Encrypted 32-bit unsigned integer (agent identifiers).
pub type Euint32 = Encrypted<u32>;
/// Encrypted boolean (comparison results).
pub type Ebool = Encrypted<bool>;

impl<T: FheType> Encrypted<T> {
    /// Backend-side constructor. The handle must name a ciphertext of kind `T`.
    #[must_use]
    pub fn wrap(handle: Handle) -> Self {
        Self {
            handle,
            _kind: PhantomData,
        }
    }

    #[must_use]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    #[must_use]
    pub fn kind(&self) -> ValueKind {
        T::KIND
    }
}

impl<T: FheType> Clone for Encrypted<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: FheType> Copy for Encrypted<T> {}

impl<T: FheType> PartialEq for Encrypted<T> {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl<T: FheType> Eq for Encrypted<T> {}

impl<T: FheType> std::hash::Hash for Encrypted<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.handle.hash(state);
    }
}

impl<T: FheType> fmt::Debug for Encrypted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", T::KIND, hex::encode(&self.handle.0[..8]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks() {
        assert_eq!(<u16 as FheUint>::mask(), 0xFFFF);
        assert_eq!(<u32 as FheUint>::mask(), 0xFFFF_FFFF);
    }

    #[test]
    fn widths_match_native_types() {
        assert_eq!(<u16 as FheUint>::BITS, u16::BITS);
        assert_eq!(<u32 as FheUint>::BITS, u32::BITS);
    }

    #[test]
    fn word_roundtrip_truncates() {
        assert_eq!(u16::from_word(0x1_0005), 5);
        assert_eq!(u32::from_word(0x1_0000_0007), 7);
        assert!(bool::from_word(3));
        assert!(!bool::from_word(2));
    }

    #[test]
    fn debug_shows_kind_not_value() {
        let v = Euint16::wrap(Handle([0xAA; 32]));
        assert_eq!(format!("{v:?}"), "euint16(aaaaaaaaaaaaaaaa)");
        assert_eq!(v.kind(), ValueKind::U16);
    }

    #[test]
    fn serde_is_transparent_handle() {
        let v = Euint32::wrap(Handle([7; 32]));
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, serde_json::to_string(&Handle([7; 32])).unwrap());
        let back: Euint32 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}

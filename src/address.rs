//! Validator addresses.
//!
//! The scheduler treats addresses as opaque byte strings; it never interprets
//! them beyond equality, ordering, and hex rendering. `Address` wraps
//! `alloy_primitives::Bytes` rather than introducing a second byte-buffer type,
//! since the rest of the crate already pulls in `alloy-primitives` for its hex
//! `Display` impl and `serde` support.

use std::fmt;

use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

/// A validator address: an opaque byte sequence, compared and ordered
/// byte-for-byte (never reinterpreted as an integer or EVM-specific type).
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(Bytes);

impl Address {
    /// Build an address from raw bytes.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Build an address from a UTF-8 string (the common case in tests and the
    /// demo binary, where addresses are short mnemonic names).
    pub fn from_str_bytes(s: &str) -> Self {
        Self(Bytes::from(s.as_bytes().to_vec()))
    }

    /// Raw bytes backing this address.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Render as plain text when the address is printable ASCII (the
        // common case for test fixtures and the demo binary); fall back to
        // hex for genuinely opaque byte sequences.
        if self.0.iter().all(|&b| b.is_ascii_graphic() || b == b' ') {
            write!(f, "{}", String::from_utf8_lossy(&self.0))
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::from_str_bytes(s)
    }
}

impl From<Vec<u8>> for Address {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicographic_ordering_is_byte_wise() {
        let a = Address::from("alice");
        let b = Address::from("bob");
        assert!(a < b);
    }

    #[test]
    fn display_round_trips_printable_addresses() {
        let addr = Address::from("validator-7");
        assert_eq!(addr.to_string(), "validator-7");
    }
}

//! Fixed-width identifiers: addresses, selectors, proposal ids, config keys.
//!
//! All identifiers are BLAKE3-derived byte arrays rendered as `0x`-prefixed
//! lowercase hex.

use crate::Timestamp;
use std::fmt;
use std::str::FromStr;

/// Errors from parsing a hex identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("invalid length: expected {expected} hex chars, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("invalid hex encoding")]
    InvalidHex,
}

macro_rules! hex_id {
    ($name:ident, $len:expr, $label:literal) => {
        impl $name {
            pub const LEN: usize = $len;

            pub fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub fn to_hex(&self) -> String {
                format!("0x{}", hex::encode(self.0))
            }

            pub fn from_hex(s: &str) -> Result<Self, IdParseError> {
                let digits = s.strip_prefix("0x").unwrap_or(s);
                if digits.len() != $len * 2 {
                    return Err(IdParseError::InvalidLength {
                        expected: $len * 2,
                        actual: digits.len(),
                    });
                }
                let mut bytes = [0u8; $len];
                hex::decode_to_slice(digits, &mut bytes).map_err(|_| IdParseError::InvalidHex)?;
                Ok(Self(bytes))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $label, self.to_hex())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Principal, facet or router identity (20 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

hex_id!(Address, 20, "Address");

impl Address {
    /// The null address. Also the "no module" sentinel in facet cuts.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Deterministically derive an address from a label.
    pub fn derive(label: &str) -> Self {
        let hash = blake3::hash(label.as_bytes());
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash.as_bytes()[..20]);
        Self(bytes)
    }

    /// Derive the address of something created by `creator` at `nonce`.
    pub fn derive_created(creator: &Address, nonce: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"org.create");
        hasher.update(&creator.0);
        hasher.update(&nonce.to_be_bytes());
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hasher.finalize().as_bytes()[..20]);
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

/// Operation identifier: the first four bytes of `blake3(operation name)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selector(pub [u8; 4]);

hex_id!(Selector, 4, "Selector");

impl Selector {
    pub fn from_name(name: &str) -> Self {
        let hash = blake3::hash(name.as_bytes());
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&hash.as_bytes()[..4]);
        Self(bytes)
    }
}

/// Unique proposal identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProposalId(pub [u8; 32]);

hex_id!(ProposalId, 32, "ProposalId");

impl ProposalId {
    /// `blake3(submitted_at ‖ submitter ‖ nonce)`.
    ///
    /// The nonce is unique per organization, so ids never collide even when
    /// one submitter files several proposals at the same instant.
    pub fn derive(submitted_at: Timestamp, submitter: &Address, nonce: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&submitted_at.to_be_bytes());
        hasher.update(&submitter.0);
        hasher.update(&nonce.to_be_bytes());
        Self(*hasher.finalize().as_bytes())
    }
}

/// Namespaced configuration key: `blake3("org.config." + name)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigKey(pub [u8; 32]);

hex_id!(ConfigKey, 32, "ConfigKey");

impl ConfigKey {
    pub fn named(name: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"org.config.");
        hasher.update(name.as_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    /// Per-proposal payout recipient key (`RECIPIENT_<id>`).
    pub fn recipient(proposal: &ProposalId) -> Self {
        Self::named(&format!("RECIPIENT_{}", proposal.to_hex()))
    }
}

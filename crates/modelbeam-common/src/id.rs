//! Pairing, update, and session identifiers.
//!
//! Pairing and update ids are plain random integers, not UUIDs: they ride
//! inside relay URL paths and the shared relay namespace only needs them to
//! be collision-resistant for a human-scale number of concurrent editors.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Exclusive upper bound for generated ids (~20 decimal digits).
///
/// Not a cryptographic guarantee; collisions on a shared relay are merely
/// improbable at this magnitude.
pub const ID_BOUND: u64 = 10_000_000_000_000_000_000;

fn random_id() -> u64 {
    rand::thread_rng().gen_range(0..ID_BOUND)
}

/// Identifier scoping every relay URL of one editor session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairingId(u64);

impl PairingId {
    /// Mint a fresh pairing id. Generated once per editor session.
    pub fn generate() -> Self {
        Self(random_id())
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PairingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PairingId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Viewers recover the pairing id from the `?id=` query parameter of the
/// page URL they scanned.
impl std::str::FromStr for PairingId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Identifier minted per dispatch; disambiguates successive pushes of the
/// same asset type to the same session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateId(u64);

impl UpdateId {
    pub fn generate() -> Self {
        Self(random_id())
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UpdateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UpdateId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Opaque viewer-supplied session identifier, taken verbatim from the ping
/// payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

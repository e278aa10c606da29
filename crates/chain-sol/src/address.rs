//! Solana public keys and their Base58 address form.
//!
//! A Solana address is the Base58 encoding of a raw 32-byte key. The key is
//! either an Ed25519 public key or a program-derived address, which is
//! deliberately off the curve. No hashing is applied when encoding.

use std::fmt;
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SolError;

/// A 32-byte account address. Borsh encodes it as the raw 32 bytes.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, BorshSerialize, BorshDeserialize,
)]
pub struct Pubkey([u8; 32]);

impl Pubkey {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Whether the key is a valid Ed25519 point, i.e. could have a private key.
    pub fn is_on_curve(&self) -> bool {
        crate::pda::is_on_curve(&self.0)
    }
}

impl AsRef<[u8]> for Pubkey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Pubkey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Pubkey {
    type Err = SolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        address_to_bytes(s).map(Self)
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bytes_to_address(&self.0))
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({self})")
    }
}

impl Serialize for Pubkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Pubkey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Validate a Solana address string.
///
/// A valid address is a Base58 string that decodes to exactly 32 bytes.
pub fn validate_address(address: &str) -> Result<bool, SolError> {
    address_to_bytes(address).map(|_| true)
}

/// Decode a Solana address string to its 32-byte representation.
pub fn address_to_bytes(address: &str) -> Result<[u8; 32], SolError> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| SolError::InvalidAddress(format!("base58 decode failed: {e}")))?;

    let arr: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
        SolError::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
    })?;

    Ok(arr)
}

/// Encode 32 bytes as a Solana address (Base58 string).
pub fn bytes_to_address(bytes: &[u8; 32]) -> String {
    bs58::encode(bytes).into_string()
}

//! # Component Addresses
//!
//! Every component lives at a 20-byte [`Address`]. Fresh deployments get an
//! address derived from the deployer and its deployment nonce; externally known
//! components are attached at an address parsed from configuration.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt::{self, Debug, Display};
use std::str::FromStr;

/// A 20-byte component or signer address, rendered as `0x`-prefixed lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 20]);

/// Errors produced when parsing an [`Address`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    #[error("address must start with 0x: {0}")]
    MissingPrefix(String),
    #[error("address must have 40 hex digits, got {0}")]
    Length(usize),
    #[error("invalid hex digit in address: {0}")]
    InvalidDigit(String),
}

impl Address {
    /// The zero address. Used as the "disabled" sentinel for optional dependencies.
    pub const ZERO: Self = Self([0; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 20]
    }

    /// Derives a stable address from a label (local dev accounts, test fixtures).
    pub fn derive(label: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"label:");
        hasher.update(label.as_bytes());
        Self::from_digest(&hasher.finalize())
    }

    /// The address a deployment from `deployer` with the given nonce lands at.
    pub fn create(deployer: Address, nonce: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"create:");
        hasher.update(deployer.0);
        hasher.update(nonce.to_be_bytes());
        Self::from_digest(&hasher.finalize())
    }

    fn from_digest(digest: &[u8]) -> Self {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[digest.len() - 20..]);
        Self(bytes)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| AddressParseError::MissingPrefix(s.to_string()))?;
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes).map_err(|e| match e {
            hex::FromHexError::InvalidHexCharacter { c, .. } => {
                AddressParseError::InvalidDigit(c.to_string())
            }
            _ => AddressParseError::Length(digits.chars().count()),
        })?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_round_trip_mixed_case() {
        let address: Address = "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599".parse().unwrap();
        assert_eq!(
            address.to_string(),
            "0x2260fac5e5542a773aa44fbcfedf7c193bc2c599"
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            "2260fac5e5542a773aa44fbcfedf7c193bc2c599".parse::<Address>(),
            Err(AddressParseError::MissingPrefix(_))
        ));
        assert_eq!("0x1234".parse::<Address>(), Err(AddressParseError::Length(4)));
        assert!(matches!(
            "0xzz60fac5e5542a773aa44fbcfedf7c193bc2c599".parse::<Address>(),
            Err(AddressParseError::InvalidDigit(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_ascii_without_panicking() {
        let text = format!("0xa\u{e9}{}", "0".repeat(37));
        assert!(matches!(
            text.parse::<Address>(),
            Err(AddressParseError::InvalidDigit(_))
        ));
        assert!("0x\u{e9}\u{e9}".parse::<Address>().is_err());
    }

    #[test]
    fn test_derived_addresses_are_stable_and_distinct() {
        assert_eq!(Address::derive("governance"), Address::derive("governance"));
        assert_ne!(Address::derive("governance"), Address::derive("keeper"));
        assert!(!Address::derive("governance").is_zero());
        assert!(Address::ZERO.is_zero());
    }

    #[test]
    fn test_create_depends_on_nonce() {
        let deployer = Address::derive("deployer");
        assert_ne!(Address::create(deployer, 0), Address::create(deployer, 1));
        assert_eq!(Address::create(deployer, 7), Address::create(deployer, 7));
    }

    #[test]
    fn test_serde_uses_hex_string() {
        let address = Address::derive("treasury");
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{address}\""));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}

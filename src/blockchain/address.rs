// src/blockchain/address.rs

use blake2::{digest::consts::U32, Blake2b, Digest};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// BLAKE2b with a 256-bit output, used for addresses and signing digests.
pub type Blake2b256 = Blake2b<U32>;

pub const SUI_ADDRESS_LENGTH: usize = 32;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AddressParseError {
    #[error("address is empty")]
    Empty,
    #[error("address is longer than 32 bytes")]
    TooLong,
    #[error("address is not valid hex: {0}")]
    InvalidHex(String),
}

/// A 32-byte Sui account or object address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SuiAddress([u8; SUI_ADDRESS_LENGTH]);

impl SuiAddress {
    /// Derives the address owning `public_key` under the scheme identified by `flag`.
    pub fn from_public_key(flag: u8, public_key: &[u8]) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update([flag]);
        hasher.update(public_key);
        Self(hasher.finalize().into())
    }
}

impl FromStr for SuiAddress {
    type Err = AddressParseError;

    /// Accepts `0x`-prefixed or bare hex in any case. Short forms such as `0x2`
    /// are left-padded with zeros.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(AddressParseError::Empty);
        }
        if digits.len() > SUI_ADDRESS_LENGTH * 2 {
            return Err(AddressParseError::TooLong);
        }
        let padded = format!("{:0>64}", digits);
        let mut bytes = [0u8; SUI_ADDRESS_LENGTH];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|e| AddressParseError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuiAddress({})", self)
    }
}

impl Serialize for SuiAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SuiAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_form_is_left_padded() {
        let addr: SuiAddress = "0x2".parse().unwrap();
        assert_eq!(
            addr.to_string(),
            "0x0000000000000000000000000000000000000000000000000000000000000002"
        );
    }

    #[test]
    fn parsing_ignores_case_and_prefix() {
        let upper: SuiAddress = "0xABCDEF".parse().unwrap();
        let bare: SuiAddress = "abcdef".parse().unwrap();
        assert_eq!(upper, bare);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!("0x".parse::<SuiAddress>(), Err(AddressParseError::Empty));
        assert!(matches!(
            "0xzz".parse::<SuiAddress>(),
            Err(AddressParseError::InvalidHex(_))
        ));
        let too_long = format!("0x{}", "a".repeat(65));
        assert_eq!(too_long.parse::<SuiAddress>(), Err(AddressParseError::TooLong));
    }
}

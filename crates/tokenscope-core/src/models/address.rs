use std::fmt;
use std::str::FromStr;

use alloy_primitives::Address;
use serde::Serialize;

use crate::config::eth_address;
use crate::ens;
use crate::error::ValidationError;
use crate::input;

/// A syntactically valid, non-zero Ethereum address.
///
/// The original casing of the input is preserved; no checksum
/// normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EthAddress(String);

impl EthAddress {
    /// Validate `s` and wrap it. See [`input::validate_address`].
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        input::validate_address(s)
    }

    /// Wrap a string already checked by the address validator.
    pub(crate) fn from_validated(s: String) -> Self {
        Self(s)
    }

    /// Convert a decoded on-chain address, rejecting the zero address.
    pub fn from_alloy(address: Address) -> Option<Self> {
        if address.is_zero() {
            None
        } else {
            Some(Self(address.to_checksum(None)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened display form (0x1234...5678).
    pub fn short(&self) -> String {
        format!(
            "{}...{}",
            &self.0[..eth_address::SHORT_PREFIX_LEN],
            &self.0[eth_address::SHORT_SUFFIX_START..]
        )
    }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EthAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for EthAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A string accepted by the ENS name heuristic, as the user typed it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EnsName(String);

impl EnsName {
    /// Wrap `s` if it passes [`input::looks_like_ens`].
    pub fn parse(s: &str) -> Option<Self> {
        input::looks_like_ens(s).then(|| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Normalized form used for hashing and cache lookups.
    pub fn normalized(&self) -> String {
        ens::normalize(&self.0)
    }
}

impl fmt::Display for EnsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VITALIK: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    #[test]
    fn test_parse_preserves_case() {
        let lower = VITALIK.to_lowercase();
        let addr = EthAddress::parse(&lower).unwrap();
        assert_eq!(addr.as_str(), lower);
        assert_ne!(addr, EthAddress::parse(VITALIK).unwrap());
    }

    #[test]
    fn test_from_alloy_rejects_zero() {
        assert_eq!(EthAddress::from_alloy(Address::ZERO), None);
        let addr = Address::from_str(VITALIK).unwrap();
        assert_eq!(EthAddress::from_alloy(addr).unwrap().as_str(), VITALIK);
    }

    #[test]
    fn test_short() {
        let addr = EthAddress::parse("0x1234567890abcdef1234567890abcdef12345678").unwrap();
        assert_eq!(addr.short(), "0x1234...5678");
    }

    #[test]
    fn test_ens_name_parse() {
        assert!(EnsName::parse("vitalik.eth").is_some());
        assert!(EnsName::parse("ab.eth").is_none());
        assert_eq!(
            EnsName::parse("Vitalik.ETH").map(|n| n.normalized()),
            Some("vitalik.eth".to_string())
        );
    }
}

//! Input classification and validation.
//!
//! Turns raw user text into a typed [`InputClassification`]. All functions
//! here are pure and total: malformed input is reported through
//! [`ValidationError`], never a panic.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::{eth_address, ens};
use crate::error::ValidationError;
use crate::models::{EnsName, EthAddress};

static HEX_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("address pattern is valid"));

static ENS_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("label pattern is valid"));

/// What the user asked to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputClassification {
    /// Nothing typed yet. Only produced by [`classify_live`].
    Empty,
    Address(EthAddress),
    Ens(EnsName),
    Invalid(ValidationError),
}

impl InputClassification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Address(_) | Self::Ens(_))
    }

    /// Short hint rendered under the input field.
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Address(_) => Some("address".to_string()),
            Self::Ens(_) => Some("ENS name".to_string()),
            Self::Invalid(err) => Some(err.to_string()),
        }
    }
}

/// Classify submitted input.
///
/// Blank input is an error here; use [`classify_live`] for keystroke hints.
pub fn classify(input: &str) -> InputClassification {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return InputClassification::Invalid(ValidationError::Required);
    }

    if let Some(name) = EnsName::parse(trimmed) {
        return InputClassification::Ens(name);
    }

    if trimmed.starts_with(eth_address::PREFIX) {
        return match validate_address(trimmed) {
            Ok(address) => InputClassification::Address(address),
            Err(err) => InputClassification::Invalid(err),
        };
    }

    InputClassification::Invalid(ValidationError::NotAddressOrEns)
}

/// Classify input while the user is still typing. Blank input is `Empty`.
pub fn classify_live(input: &str) -> InputClassification {
    if input.trim().is_empty() {
        InputClassification::Empty
    } else {
        classify(input)
    }
}

/// Validate Ethereum address syntax. The first failing check wins.
pub fn validate_address(s: &str) -> Result<EthAddress, ValidationError> {
    if !s.starts_with(eth_address::PREFIX) {
        return Err(ValidationError::MissingPrefix);
    }
    if s.chars().count() != eth_address::FULL_LEN {
        return Err(ValidationError::WrongLength);
    }
    if !HEX_ADDRESS.is_match(s) {
        return Err(ValidationError::InvalidCharacters);
    }
    if s.eq_ignore_ascii_case(eth_address::ZERO) {
        return Err(ValidationError::ZeroAddress);
    }
    Ok(EthAddress::from_validated(s.to_string()))
}

/// Heuristic check for ENS-style names (`label.suffix`).
///
/// Only suffixes in the allow-list are recognised, in any ASCII case, and
/// the label must be at least three `[A-Za-z0-9-]` characters. Subdomains
/// are not accepted.
pub fn looks_like_ens(s: &str) -> bool {
    if s.chars().count() < ens::MIN_NAME_LEN || !s.contains('.') {
        return false;
    }

    let Some(label) = ens::SUFFIXES
        .iter()
        .find_map(|suffix| strip_suffix_ignore_case(s, suffix))
    else {
        return false;
    };

    label.chars().count() >= ens::MIN_LABEL_LEN && ENS_LABEL.is_match(label)
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let split = s.len().checked_sub(suffix.len())?;
    let tail = s.get(split..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &s[..split])
}

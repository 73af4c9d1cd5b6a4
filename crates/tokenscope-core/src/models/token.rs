use serde::{Deserialize, Serialize};

use crate::config::placeholder;
use crate::models::EthAddress;

// =============================================================================
// Wire Types
// =============================================================================

/// Balance list as returned by the token API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalancesResponse {
    pub address: Option<String>,
    /// `None` when the API omitted the list, which is a contract violation.
    pub token_balances: Option<Vec<RawTokenBalance>>,
}

/// One untrusted balance row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTokenBalance {
    pub contract_address: Option<String>,
    pub token_balance: Option<String>,
}

impl RawTokenBalance {
    pub fn new(contract_address: &str, token_balance: &str) -> Self {
        Self {
            contract_address: Some(contract_address.to_string()),
            token_balance: Some(token_balance.to_string()),
        }
    }
}

/// Token metadata as returned by the token API. Every field may be null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadataResponse {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub decimals: Option<u32>,
    pub logo: Option<String>,
}

// =============================================================================
// Domain Types
// =============================================================================

/// A token held by the queried address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalanceEntry {
    pub contract_address: EthAddress,
    /// Balance in the token's smallest unit, hex (`0x…`) or decimal.
    pub raw_balance: String,
}

/// Display metadata for one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub symbol: String,
    pub name: Option<String>,
    pub decimals: u32,
    pub logo_url: Option<String>,
}

impl TokenMetadata {
    /// Stand-in for tokens whose metadata could not be fetched.
    pub fn placeholder() -> Self {
        Self {
            symbol: placeholder::SYMBOL.to_string(),
            name: None,
            decimals: placeholder::DECIMALS,
            logo_url: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl From<TokenMetadataResponse> for TokenMetadata {
    fn from(response: TokenMetadataResponse) -> Self {
        let non_empty = |s: Option<String>| s.filter(|s| !s.trim().is_empty());

        Self {
            symbol: non_empty(response.symbol).unwrap_or_else(|| placeholder::SYMBOL.to_string()),
            name: non_empty(response.name),
            decimals: response.decimals.unwrap_or(placeholder::DECIMALS),
            logo_url: non_empty(response.logo),
        }
    }
}

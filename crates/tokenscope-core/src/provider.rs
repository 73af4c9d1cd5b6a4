//! External capabilities consumed by the core.
//!
//! - [`WalletProvider`] / [`EnsResolver`] - an injected browser wallet
//!   (accounts and ENS lookups)
//! - [`TokenApi`] - the blockchain-data API serving balances and metadata
//!
//! Implementations run on a single-threaded executor, so the returned futures
//! are not required to be `Send`.

#![allow(async_fn_in_trait)]

use crate::error::{ApiError, CredentialError, ProviderError};
use crate::models::{TokenBalancesResponse, TokenMetadataResponse};

/// Wallet provider capability (EIP-1193 style).
pub trait WalletProvider {
    type Resolver: EnsResolver;

    /// Accounts the site is already authorized for. Must never prompt.
    async fn list_authorized_accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// Ask the user to authorize account access.
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// Look up the resolver record for a normalized ENS name.
    async fn get_resolver(&self, name: &str) -> Result<Option<Self::Resolver>, ProviderError>;
}

/// A resolver record for one ENS name.
pub trait EnsResolver {
    /// The address the name points to, if any.
    async fn get_address(&self) -> Result<Option<String>, ProviderError>;
}

/// Balance and metadata API capability.
pub trait TokenApi {
    /// Pre-flight credential check. Must not touch the network.
    fn check_credential(&self) -> Result<(), CredentialError>;

    async fn get_token_balances(&self, address: &str) -> Result<TokenBalancesResponse, ApiError>;

    async fn get_token_metadata(
        &self,
        contract_address: &str,
    ) -> Result<TokenMetadataResponse, ApiError>;
}

/// Opaque token API credential.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Values shipped in sample configs that are never real keys.
    const PLACEHOLDERS: &'static [&'static str] = &["YOUR_API_KEY", "your-api-key", "demo", "changeme"];

    /// Validate a configured credential without contacting the API.
    pub fn parse(raw: Option<&str>) -> Result<Self, CredentialError> {
        let key = raw.map(str::trim).unwrap_or_default();
        if key.is_empty() {
            return Err(CredentialError::Missing);
        }
        if key.chars().any(char::is_whitespace)
            || Self::PLACEHOLDERS.iter().any(|p| key.eq_ignore_ascii_case(p))
        {
            return Err(CredentialError::Invalid);
        }
        Ok(Self(key.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_parse() {
        assert_eq!(ApiKey::parse(None), Err(CredentialError::Missing));
        assert_eq!(ApiKey::parse(Some("   ")), Err(CredentialError::Missing));
        assert_eq!(ApiKey::parse(Some("YOUR_API_KEY")), Err(CredentialError::Invalid));
        assert_eq!(ApiKey::parse(Some("abc def")), Err(CredentialError::Invalid));
        let key = ApiKey::parse(Some(" k3yMaterial_123 ")).unwrap();
        assert_eq!(key.expose(), "k3yMaterial_123");
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::parse(Some("secret-value")).unwrap();
        assert_eq!(format!("{:?}", key), "ApiKey(***)");
    }
}

//! Application configuration.
//!
//! Compile-time constants plus the runtime [`AppConfig`], which is parsed
//! from `assets/config.toml` (embedded with `include_str!`).

use log::LevelFilter;
use serde::Deserialize;

// =============================================================================
// Application Metadata
// =============================================================================

/// Application name displayed in the header.
pub const APP_NAME: &str = "tokenscope";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Network Configuration
// =============================================================================

/// Default token API request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 10_000;

/// Block explorer page for a token contract.
pub const EXPLORER_TOKEN_URL: &str = "https://etherscan.io/token/";

// =============================================================================
// Wallet Configuration
// =============================================================================

/// localStorage flag set when the user explicitly disconnects.
///
/// While present, auto-detect on page load is skipped.
pub const WALLET_DISCONNECTED_KEY: &str = "wallet_disconnected";

/// Timeout for the silent `eth_accounts` lookup in milliseconds.
pub const WALLET_TIMEOUT_MS: i32 = 2000;

// =============================================================================
// UI Configuration
// =============================================================================

/// Available icon themes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum IconTheme {
    Lucide,
    Bootstrap,
}

/// Active icon theme.
pub const ICON_THEME: IconTheme = IconTheme::Lucide;

// =============================================================================
// Runtime Configuration
// =============================================================================

const CONFIG_TOML: &str = include_str!("../assets/config.toml");

/// Token API settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Network slug substituted for `{network}` in the endpoint.
    pub network: String,
    /// Endpoint template with `{network}` and `{api_key}` placeholders.
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            network: "eth-mainnet".to_string(),
            endpoint: "https://{network}.g.alchemy.com/v2/{api_key}".to_string(),
            api_key: None,
        }
    }
}

impl ApiConfig {
    /// Endpoint URL for a given key.
    pub fn endpoint_url(&self, api_key: &str) -> String {
        self.endpoint
            .replace("{network}", &self.network)
            .replace("{api_key}", api_key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    pub request_timeout_ms: u32,
    pub api: ApiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            api: ApiConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse a TOML config document. Missing keys take their defaults.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load the embedded config, applying the build-time key override.
    ///
    /// A malformed embedded file falls back to defaults; the error is
    /// reported once the logger is up.
    pub fn load() -> (Self, Option<String>) {
        let (mut config, problem) = match Self::parse(CONFIG_TOML) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e.to_string())),
        };
        if let Some(key) = option_env!("TOKENSCOPE_API_KEY") {
            config.api.api_key = Some(key.to_string());
        }
        (config, problem)
    }

    /// Log level filter, `Info` when the configured name is unknown.
    pub fn log_level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_parses() {
        let config = AppConfig::parse(CONFIG_TOML).unwrap();
        assert_eq!(config.api.network, "eth-mainnet");
        assert_eq!(config.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = AppConfig::parse("[api]\napi_key = \"abc\"\n").unwrap();
        assert_eq!(config.api.api_key.as_deref(), Some("abc"));
        assert_eq!(config.api.network, "eth-mainnet");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_endpoint_url() {
        let api = ApiConfig::default();
        assert_eq!(
            api.endpoint_url("k3y"),
            "https://eth-mainnet.g.alchemy.com/v2/k3y"
        );
    }

    #[test]
    fn test_log_level() {
        let mut config = AppConfig::default();
        config.log_level = "debug".to_string();
        assert_eq!(config.log_level(), LevelFilter::Debug);
        config.log_level = "chatty".to_string();
        assert_eq!(config.log_level(), LevelFilter::Info);
    }
}

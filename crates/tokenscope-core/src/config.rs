//! Core configuration constants.
//!
//! Everything here is fixed at compile time. Runtime-adjustable settings
//! (API endpoint, credential, log level) live in the web application's
//! `AppConfig`.

// =============================================================================
// Address Rules
// =============================================================================

/// Ethereum address layout.
pub mod eth_address {
    /// Required `0x` prefix.
    pub const PREFIX: &str = "0x";
    /// Full length including the `0x` prefix.
    pub const FULL_LEN: usize = 42;
    /// Reserved all-zero address, never a valid query target.
    pub const ZERO: &str = "0x0000000000000000000000000000000000000000";
    /// Characters kept at the front of a shortened address (`0x1234`).
    pub const SHORT_PREFIX_LEN: usize = 6;
    /// Start of the kept tail of a shortened address (last 4 hex digits).
    pub const SHORT_SUFFIX_START: usize = 38;
}

// =============================================================================
// ENS Heuristic
// =============================================================================

/// ENS name heuristic limits.
pub mod ens {
    /// Top-level suffixes accepted as ENS-style names.
    pub const SUFFIXES: &[&str] = &[".eth", ".xyz", ".kred", ".luxe", ".club", ".art"];
    /// Minimum total length of an ENS-style name.
    pub const MIN_NAME_LEN: usize = 7;
    /// Minimum length of the label preceding the suffix.
    pub const MIN_LABEL_LEN: usize = 3;
    /// ENS registry contract (same address on mainnet and testnets).
    pub const REGISTRY: &str = "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e";
}

// =============================================================================
// Token Metadata
// =============================================================================

/// Values used when token metadata is missing or could not be fetched.
pub mod placeholder {
    /// Symbol shown for tokens whose metadata is unknown.
    pub const SYMBOL: &str = "UNKNOWN";
    /// Decimals assumed when the token does not report any.
    pub const DECIMALS: u32 = 18;
}

// =============================================================================
// Display
// =============================================================================

/// Number of fractional digits in a formatted balance.
pub const BALANCE_FRACTION_DIGITS: u32 = 4;

/// Shown in place of a balance that could not be parsed.
pub const UNPARSEABLE_BALANCE: &str = "—";

// =============================================================================
// Wallet Provider
// =============================================================================

/// EIP-1193 error code for a request the user rejected.
pub const USER_REJECTED_CODE: i64 = 4001;

//! Error types for the balance lookup pipeline.
//!
//! Every failure that can reach the user carries a human-readable message
//! (`Display`) and a machine-checkable [`ErrorKind`]:
//!
//! - [`ValidationError`] - malformed address or ENS input
//! - [`ResolveError`] - ENS name could not be turned into an address
//! - [`CredentialError`] - token API credential missing or unusable
//! - [`ApiError`] - transport-level outcome of a token API call
//! - [`FetchError`] - classified balance-fetch failure
//! - [`ProviderError`], [`WalletError`] - wallet provider requests
//! - [`QueryError`] - the single current error of a query

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::config::USER_REJECTED_CODE;

/// Machine-checkable error category exposed to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Ens,
    Credential,
    Network,
    RateLimit,
    Auth,
    Server,
    MalformedResponse,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Ens => "ens",
            Self::Credential => "credential",
            Self::Network => "network",
            Self::RateLimit => "rate_limit",
            Self::Auth => "auth",
            Self::Server => "server",
            Self::MalformedResponse => "malformed_response",
            Self::Unknown => "unknown",
        }
    }

    /// Whether retrying the same query may succeed without user changes.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network | Self::RateLimit | Self::Server)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input validation failures. Messages are shown verbatim next to the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("address or wallet required")]
    Required,
    #[error("must be 0x-address or ENS name")]
    NotAddressOrEns,
    #[error("must start with 0x")]
    MissingPrefix,
    #[error("must be 42 characters")]
    WrongLength,
    #[error("invalid characters")]
    InvalidCharacters,
    #[error("zero address forbidden")]
    ZeroAddress,
}

/// Failure reported by an EIP-1193 wallet provider request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    /// EIP-1193 / JSON-RPC error code, when the provider supplied one.
    pub code: Option<i64>,
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    /// The user dismissed or rejected the request in the wallet UI.
    pub fn is_user_rejection(&self) -> bool {
        self.code == Some(USER_REJECTED_CODE)
    }
}

/// ENS resolution failures. Every message embeds the name being resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("cannot resolve {name}: no wallet provider available")]
    NoProvider { name: String },
    #[error("ENS name {name} not found (no resolver)")]
    NotFound { name: String },
    #[error("ENS name {name} does not resolve to an address")]
    UnresolvedOrZero { name: String },
    #[error("failed to resolve {name}: {source}")]
    Provider {
        name: String,
        #[source]
        source: ProviderError,
    },
}

/// Token API credential problems, detected before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("token API key missing (set TOKENSCOPE_API_KEY or api.api_key)")]
    Missing,
    #[error("token API key is invalid")]
    Invalid,
}

/// Raw outcome of a failed token API call, before classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("HTTP error: {0}")]
    Http(u16),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("API error {code}: {message}")]
    Rpc { code: i64, message: String },
}

/// Classified balance-fetch failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error("network error: {0}")]
    Network(String),
    #[error("rate limited by the token API, try again shortly")]
    RateLimited,
    #[error("token API rejected the credential (HTTP {0})")]
    Auth(u16),
    #[error("token API server error (HTTP {0})")]
    Server(u16),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Credential(_) => ErrorKind::Credential,
            Self::Network(_) => ErrorKind::Network,
            Self::RateLimited => ErrorKind::RateLimit,
            Self::Auth(_) => ErrorKind::Auth,
            Self::Server(_) => ErrorKind::Server,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }

    fn from_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimited,
            401 | 403 => Self::Auth(status),
            500..=599 => Self::Server(status),
            other => Self::Unknown(format!("unexpected HTTP status {}", other)),
        }
    }
}

impl From<ApiError> for FetchError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Network(msg) => Self::Network(msg),
            ApiError::Timeout => Self::Network("request timed out".to_string()),
            ApiError::Http(status) => Self::from_status(status),
            ApiError::Decode(msg) => Self::MalformedResponse(msg),
            // Some providers mirror HTTP statuses inside JSON-RPC errors.
            ApiError::Rpc { code, message } => match u16::try_from(code) {
                Ok(status @ (401 | 403 | 429)) => Self::from_status(status),
                _ => Self::Unknown(format!("API error {}: {}", code, message)),
            },
        }
    }
}

/// Wallet session failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("no wallet provider found, install a browser wallet such as MetaMask")]
    NoProvider,
    #[error("wallet connection request was rejected")]
    UserRejected,
    #[error("wallet returned no account")]
    NoAccount,
    #[error("wallet request failed: {0}")]
    Provider(ProviderError),
}

impl From<ProviderError> for WalletError {
    fn from(err: ProviderError) -> Self {
        if err.is_user_rejection() {
            Self::UserRejected
        } else {
            Self::Provider(err)
        }
    }
}

/// The single current error of a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Ens(#[from] ResolveError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl QueryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Ens(_) => ErrorKind::Ens,
            Self::Fetch(err) => err.kind(),
        }
    }
}

impl From<CredentialError> for QueryError {
    fn from(err: CredentialError) -> Self {
        Self::Fetch(FetchError::Credential(err))
    }
}

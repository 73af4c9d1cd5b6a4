//! Core logic for the token balance viewer.
//!
//! This crate is UI-agnostic. It provides:
//! - [`classify`], [`validate_address`], [`looks_like_ens`] - input classification
//! - [`ens::resolve`] - ENS name resolution over an injected [`WalletProvider`]
//! - [`BalanceFetcher`] - balance fetch and fault-tolerant metadata fan-out over a [`TokenApi`]
//! - [`QueryOrchestrator`] - the query state machine driver
//! - [`session`] - wallet auto-detect, connect, and disconnect
//! - [`RenderModel`] - the view model the UI draws

pub mod config;
pub mod ens;
pub mod error;
mod fetcher;
pub mod format;
mod input;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod models;
mod orchestrator;
pub mod provider;
pub mod session;

pub use error::{
    ApiError, CredentialError, ErrorKind, FetchError, ProviderError, QueryError, ResolveError,
    ValidationError, WalletError,
};
pub use fetcher::{BalanceFetcher, or_fallback};
pub use input::{InputClassification, classify, classify_live, looks_like_ens, validate_address};
pub use models::{
    EnsDisplay, EnsName, EthAddress, Phase, QueryEvent, QueryState, RenderModel, TokenBalanceEntry,
    TokenMetadata, TokenView, WalletSession,
};
pub use orchestrator::{QueryOrchestrator, QueryStore};
pub use provider::{ApiKey, EnsResolver, TokenApi, WalletProvider};

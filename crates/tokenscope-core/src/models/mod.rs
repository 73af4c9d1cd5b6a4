//! Data model for the balance lookup.
//!
//! - [`EthAddress`], [`EnsName`] - validated lookup targets
//! - [`TokenBalanceEntry`], [`TokenMetadata`] - query results (plus API wire types)
//! - [`QueryState`], [`QueryEvent`], [`Phase`] - the query state machine
//! - [`RenderModel`] - what the UI draws
//! - [`WalletSession`] - wallet connection state

mod address;
mod query;
mod render;
mod token;
mod wallet;

pub use address::{EnsName, EthAddress};
pub use query::{EnsResolution, Phase, QueryEvent, QueryState};
pub use render::{EnsDisplay, RenderModel, TokenView};
pub use token::{
    RawTokenBalance, TokenBalanceEntry, TokenBalancesResponse, TokenMetadata,
    TokenMetadataResponse,
};
pub use wallet::WalletSession;

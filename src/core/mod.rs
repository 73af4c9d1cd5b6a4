//! Browser implementations of the core provider traits.
//!
//! - [`Eip1193Wallet`] - injected wallet (accounts, ENS over `eth_call`)
//! - [`AlchemyClient`] - token balances and metadata over JSON-RPC

mod token_api;
pub mod wallet;

pub use token_api::AlchemyClient;
pub use wallet::Eip1193Wallet;

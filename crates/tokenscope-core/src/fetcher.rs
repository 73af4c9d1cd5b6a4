//! Balance and metadata retrieval.
//!
//! [`BalanceFetcher`] wraps a [`TokenApi`], classifies its failures, drops
//! malformed balance rows, and fans metadata requests out concurrently with an
//! all-settled join: each request is wrapped by [`or_fallback`] so a failing
//! token degrades to [`TokenMetadata::placeholder`] instead of failing the batch.

use std::fmt::Display;
use std::future::Future;

use futures::future::join_all;
use log::{debug, warn};

use crate::error::FetchError;
use crate::input::validate_address;
use crate::models::{EthAddress, RawTokenBalance, TokenBalanceEntry, TokenMetadata};
use crate::provider::TokenApi;

/// Await `future`, substituting `fallback()` for any error.
pub async fn or_fallback<T, E, F>(future: F, fallback: impl FnOnce() -> T, context: &str) -> T
where
    E: Display,
    F: Future<Output = Result<T, E>>,
{
    match future.await {
        Ok(value) => value,
        Err(err) => {
            warn!("{}: {}, using fallback", context, err);
            fallback()
        }
    }
}

pub struct BalanceFetcher<A> {
    api: A,
}

impl<A: TokenApi> BalanceFetcher<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Check the API credential without touching the network.
    pub fn preflight(&self) -> Result<(), FetchError> {
        self.api.check_credential().map_err(FetchError::from)
    }

    /// Fetch the token balances held by `address`.
    ///
    /// Rows without a usable contract address are dropped and logged.
    pub async fn fetch_balances(
        &self,
        address: &EthAddress,
    ) -> Result<Vec<TokenBalanceEntry>, FetchError> {
        self.preflight()?;

        let response = self.api.get_token_balances(address.as_str()).await?;
        let rows = response.token_balances.ok_or_else(|| {
            FetchError::MalformedResponse("response has no tokenBalances list".to_string())
        })?;

        let total = rows.len();
        let entries: Vec<_> = rows.into_iter().filter_map(into_entry).collect();
        debug!(
            "fetched {} balances for {} ({} dropped)",
            entries.len(),
            address,
            total - entries.len()
        );
        Ok(entries)
    }

    /// Fetch metadata for one token. Never fails: errors yield the placeholder.
    pub async fn fetch_metadata(&self, contract_address: &EthAddress) -> TokenMetadata {
        let context = format!("metadata for {}", contract_address);
        or_fallback(
            async {
                self.api
                    .get_token_metadata(contract_address.as_str())
                    .await
                    .map(TokenMetadata::from)
            },
            TokenMetadata::placeholder,
            &context,
        )
        .await
    }

    /// Fetch metadata for every entry concurrently, preserving order.
    ///
    /// The result always has the same length as `entries`.
    pub async fn fetch_all_metadata(&self, entries: &[TokenBalanceEntry]) -> Vec<TokenMetadata> {
        join_all(
            entries
                .iter()
                .map(|entry| self.fetch_metadata(&entry.contract_address)),
        )
        .await
    }
}

fn into_entry(row: RawTokenBalance) -> Option<TokenBalanceEntry> {
    let Some(contract) = row.contract_address else {
        warn!("dropping balance entry without contract address");
        return None;
    };

    match validate_address(&contract) {
        Ok(contract_address) => Some(TokenBalanceEntry {
            contract_address,
            raw_balance: row.token_balance.unwrap_or_else(|| "0".to_string()),
        }),
        Err(err) => {
            warn!("dropping balance entry with contract {:?}: {}", contract, err);
            None
        }
    }
}

//! Query state machine.
//!
//! ```text
//! Idle -> ValidatingInput -> [ResolvingName ->] FetchingBalances -> FetchingMetadata -> Done
//!                 \________________\_________________\___________________\-> Failed
//! ```
//!
//! Transitions are pure: [`QueryState::apply`] maps (state, event) to the next
//! state. Events produced by async work carry the generation of the query that
//! issued them; events from a superseded query are dropped, so a slow query can
//! never overwrite the state of a newer one.

use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use crate::error::{ErrorKind, QueryError, ValidationError};
use crate::input::InputClassification;
use crate::models::{EnsName, EthAddress, RenderModel, TokenBalanceEntry, TokenMetadata};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    #[default]
    Idle,
    ValidatingInput,
    ResolvingName,
    FetchingBalances,
    FetchingMetadata,
    Done,
    Failed,
}

impl Phase {
    /// Whether a query is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            Self::ValidatingInput
                | Self::ResolvingName
                | Self::FetchingBalances
                | Self::FetchingMetadata
        )
    }
}

/// A completed ENS lookup shown next to the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnsResolution {
    pub name: EnsName,
    pub resolved_address: EthAddress,
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryEvent {
    /// A new query starts. Supersedes any query in flight.
    Submitted,
    Classified {
        generation: u64,
        classification: InputClassification,
    },
    NameResolved {
        generation: u64,
        name: EnsName,
        address: EthAddress,
    },
    BalancesFetched {
        generation: u64,
        entries: Vec<TokenBalanceEntry>,
    },
    MetadataCollected {
        generation: u64,
        metadata: Vec<TokenMetadata>,
    },
    Failed {
        generation: u64,
        error: QueryError,
    },
    /// Wallet disconnected or input cleared. Drops all query-scoped state.
    Reset,
}

impl QueryEvent {
    fn generation(&self) -> Option<u64> {
        match self {
            Self::Submitted | Self::Reset => None,
            Self::Classified { generation, .. }
            | Self::NameResolved { generation, .. }
            | Self::BalancesFetched { generation, .. }
            | Self::MetadataCollected { generation, .. }
            | Self::Failed { generation, .. } => Some(*generation),
        }
    }
}

/// Everything scoped to the current query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    /// Identity of the current query. Bumped on submit and reset.
    pub generation: u64,
    pub phase: Phase,
    pub error: Option<QueryError>,
    pub loading_message: Option<String>,
    /// Address whose balances are being (or were) fetched.
    pub target: Option<EthAddress>,
    pub ens: Option<EnsResolution>,
    pub balances: Vec<TokenBalanceEntry>,
    /// Positionally aligned with `balances`.
    pub metadata: Vec<TokenMetadata>,
    /// Resolved ENS names, keyed by normalized name.
    pub ens_cache: HashMap<String, EthAddress>,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(QueryError::kind)
    }

    pub fn cached_resolution(&self, name: &EnsName) -> Option<EthAddress> {
        self.ens_cache.get(&name.normalized()).cloned()
    }

    pub fn render(&self) -> RenderModel {
        RenderModel::from_state(self)
    }

    /// Apply one event, producing the next state.
    pub fn apply(mut self, event: QueryEvent) -> Self {
        if let Some(generation) = event.generation()
            && !self.is_current(generation)
        {
            debug!(
                "dropping event from stale query {} (current {})",
                generation, self.generation
            );
            return self;
        }

        match event {
            QueryEvent::Submitted => {
                self.generation += 1;
                self.phase = Phase::ValidatingInput;
                self.error = None;
                self.loading_message = Some("Validating input...".to_string());
                self.clear_results();
            }
            QueryEvent::Classified { classification, .. } => {
                if self.phase != Phase::ValidatingInput {
                    return self;
                }
                match classification {
                    InputClassification::Address(address) => {
                        self.start_fetching(address);
                    }
                    InputClassification::Ens(name) => {
                        self.phase = Phase::ResolvingName;
                        self.loading_message = Some(format!("Resolving {}...", name));
                    }
                    InputClassification::Invalid(err) => {
                        self.fail(err.into());
                    }
                    InputClassification::Empty => {
                        self.fail(ValidationError::Required.into());
                    }
                }
            }
            QueryEvent::NameResolved { name, address, .. } => {
                if self.phase != Phase::ResolvingName {
                    return self;
                }
                self.ens_cache.insert(name.normalized(), address.clone());
                self.ens = Some(EnsResolution {
                    name,
                    resolved_address: address.clone(),
                });
                self.start_fetching(address);
            }
            QueryEvent::BalancesFetched { entries, .. } => {
                if self.phase != Phase::FetchingBalances {
                    return self;
                }
                if entries.is_empty() {
                    self.phase = Phase::Done;
                    self.loading_message = None;
                } else {
                    self.loading_message =
                        Some(format!("Fetching metadata for {} tokens...", entries.len()));
                    self.phase = Phase::FetchingMetadata;
                    self.balances = entries;
                }
            }
            QueryEvent::MetadataCollected { mut metadata, .. } => {
                if self.phase != Phase::FetchingMetadata {
                    return self;
                }
                metadata.resize_with(self.balances.len(), TokenMetadata::placeholder);
                self.metadata = metadata;
                self.phase = Phase::Done;
                self.loading_message = None;
            }
            QueryEvent::Failed { error, .. } => {
                if !self.phase.is_loading() {
                    return self;
                }
                self.fail(error);
            }
            QueryEvent::Reset => {
                return Self {
                    generation: self.generation + 1,
                    ..Self::default()
                };
            }
        }

        debug!("query {} -> {:?}", self.generation, self.phase);
        self
    }

    fn start_fetching(&mut self, address: EthAddress) {
        self.phase = Phase::FetchingBalances;
        self.loading_message = Some(format!("Fetching token balances for {}...", address.short()));
        self.target = Some(address);
    }

    fn fail(&mut self, error: QueryError) {
        self.phase = Phase::Failed;
        self.loading_message = None;
        self.error = Some(error);
        self.ens = None;
        self.balances.clear();
        self.metadata.clear();
    }

    fn clear_results(&mut self) {
        self.target = None;
        self.ens = None;
        self.balances.clear();
        self.metadata.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, ResolveError};
    use crate::input::classify;

    const ADDR: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
    const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";

    fn entry(contract: &str, raw: &str) -> TokenBalanceEntry {
        TokenBalanceEntry {
            contract_address: EthAddress::parse(contract).unwrap(),
            raw_balance: raw.to_string(),
        }
    }

    fn submitted() -> QueryState {
        QueryState::new().apply(QueryEvent::Submitted)
    }

    #[test]
    fn test_submit_starts_validation() {
        let state = submitted();
        assert_eq!(state.generation, 1);
        assert_eq!(state.phase, Phase::ValidatingInput);
        assert!(state.loading_message.is_some());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_invalid_input_fails() {
        let state = submitted().apply(QueryEvent::Classified {
            generation: 1,
            classification: classify("0x0000000000000000000000000000000000000000"),
        });
        assert_eq!(state.phase, Phase::Failed);
        assert_eq!(state.error_kind(), Some(ErrorKind::Validation));
        assert_eq!(state.loading_message, None);
        assert_eq!(
            state.error.unwrap().to_string(),
            "zero address forbidden"
        );
    }

    #[test]
    fn test_address_path_to_done() {
        let state = submitted()
            .apply(QueryEvent::Classified {
                generation: 1,
                classification: classify(ADDR),
            })
            .apply(QueryEvent::BalancesFetched {
                generation: 1,
                entries: vec![entry(USDC, "0x0f4240")],
            });
        assert_eq!(state.phase, Phase::FetchingMetadata);
        assert_eq!(state.target.as_ref().map(EthAddress::as_str), Some(ADDR));

        let state = state.apply(QueryEvent::MetadataCollected {
            generation: 1,
            metadata: vec![TokenMetadata::placeholder()],
        });
        assert_eq!(state.phase, Phase::Done);
        assert_eq!(state.balances.len(), state.metadata.len());
        assert_eq!(state.loading_message, None);
    }

    #[test]
    fn test_empty_balances_is_done() {
        let state = submitted()
            .apply(QueryEvent::Classified {
                generation: 1,
                classification: classify(ADDR),
            })
            .apply(QueryEvent::BalancesFetched {
                generation: 1,
                entries: vec![],
            });
        assert_eq!(state.phase, Phase::Done);
        assert!(state.error.is_none());
        assert!(state.balances.is_empty());
    }

    #[test]
    fn test_ens_resolution_is_cached() {
        let state = submitted()
            .apply(QueryEvent::Classified {
                generation: 1,
                classification: classify("vitalik.eth"),
            });
        assert_eq!(state.phase, Phase::ResolvingName);

        let name = EnsName::parse("vitalik.eth").unwrap();
        let state = state.apply(QueryEvent::NameResolved {
            generation: 1,
            name: name.clone(),
            address: EthAddress::parse(ADDR).unwrap(),
        });
        assert_eq!(state.phase, Phase::FetchingBalances);
        assert_eq!(
            state.cached_resolution(&name).as_ref().map(EthAddress::as_str),
            Some(ADDR)
        );

        // Cache survives a new submit but not a reset
        let state = state.apply(QueryEvent::Submitted);
        assert!(state.ens.is_none());
        assert!(state.cached_resolution(&name).is_some());
        let state = state.apply(QueryEvent::Reset);
        assert!(state.cached_resolution(&name).is_none());
    }

    #[test]
    fn test_stale_events_are_dropped() {
        let state = submitted().apply(QueryEvent::Submitted);
        assert_eq!(state.generation, 2);

        let state = state.apply(QueryEvent::Classified {
            generation: 1,
            classification: classify(ADDR),
        });
        assert_eq!(state.phase, Phase::ValidatingInput);
        assert_eq!(state.target, None);
    }

    #[test]
    fn test_failure_clears_results() {
        let state = submitted()
            .apply(QueryEvent::Classified {
                generation: 1,
                classification: classify(ADDR),
            })
            .apply(QueryEvent::Failed {
                generation: 1,
                error: FetchError::RateLimited.into(),
            });
        assert_eq!(state.phase, Phase::Failed);
        assert_eq!(state.error_kind(), Some(ErrorKind::RateLimit));
        assert!(state.balances.is_empty());
        assert!(state.loading_message.is_none());
    }

    #[test]
    fn test_failure_after_resolution_drops_ens_display() {
        let name = EnsName::parse("vitalik.eth").unwrap();
        let state = submitted()
            .apply(QueryEvent::Classified {
                generation: 1,
                classification: classify("vitalik.eth"),
            })
            .apply(QueryEvent::NameResolved {
                generation: 1,
                name: name.clone(),
                address: EthAddress::parse(ADDR).unwrap(),
            });
        assert!(state.render().ens_display.is_some());

        let state = state.apply(QueryEvent::Failed {
            generation: 1,
            error: FetchError::Server(503).into(),
        });
        assert_eq!(state.phase, Phase::Failed);
        assert_eq!(state.render().ens_display, None);
        assert!(state.cached_resolution(&name).is_some());
    }

    #[test]
    fn test_failure_after_done_is_ignored() {
        let done = submitted()
            .apply(QueryEvent::Classified {
                generation: 1,
                classification: classify(ADDR),
            })
            .apply(QueryEvent::BalancesFetched {
                generation: 1,
                entries: vec![],
            });
        let state = done.clone().apply(QueryEvent::Failed {
            generation: 1,
            error: ResolveError::NotFound {
                name: "x.eth".into(),
            }
            .into(),
        });
        assert_eq!(state, done);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let state = submitted()
            .apply(QueryEvent::Classified {
                generation: 1,
                classification: classify(ADDR),
            })
            .apply(QueryEvent::Reset);
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.generation, 2);
        assert_eq!(state.target, None);
        assert_eq!(state.loading_message, None);
    }

    #[test]
    fn test_metadata_is_padded_to_balances() {
        let state = submitted()
            .apply(QueryEvent::Classified {
                generation: 1,
                classification: classify(ADDR),
            })
            .apply(QueryEvent::BalancesFetched {
                generation: 1,
                entries: vec![entry(USDC, "0x1"), entry(ADDR, "0x2")],
            })
            .apply(QueryEvent::MetadataCollected {
                generation: 1,
                metadata: vec![],
            });
        assert_eq!(state.metadata.len(), 2);
        assert!(state.metadata.iter().all(TokenMetadata::is_placeholder));
    }
}

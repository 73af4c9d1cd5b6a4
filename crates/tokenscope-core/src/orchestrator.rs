//! Query orchestration.
//!
//! [`QueryOrchestrator`] sequences classification, ENS resolution, balance
//! fetch and metadata fan-out for one submitted input, feeding each outcome
//! into the pure [`QueryState`] transitions through a [`QueryStore`].
//!
//! Every query is identified by the generation assigned when it was
//! submitted. After each suspension point the orchestrator checks that its
//! query is still current and stops issuing work otherwise; the state machine
//! independently drops any late event from a superseded query.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};

use crate::ens;
use crate::error::QueryError;
use crate::fetcher::BalanceFetcher;
use crate::input::{InputClassification, classify, classify_live};
use crate::models::{EthAddress, QueryEvent, QueryState};
use crate::provider::{TokenApi, WalletProvider};

/// Owner of the current [`QueryState`].
///
/// The web app backs this with a reactive signal; tests use
/// `Rc<RefCell<QueryState>>`.
pub trait QueryStore {
    fn read<R>(&self, f: impl FnOnce(&QueryState) -> R) -> R;

    fn write(&self, f: impl FnOnce(&mut QueryState));

    /// Apply one event as a single atomic state replacement.
    fn dispatch(&self, event: QueryEvent) {
        self.write(|state| {
            let current = std::mem::take(state);
            *state = current.apply(event);
        });
    }

    fn snapshot(&self) -> QueryState {
        self.read(QueryState::clone)
    }
}

impl QueryStore for Rc<RefCell<QueryState>> {
    fn read<R>(&self, f: impl FnOnce(&QueryState) -> R) -> R {
        f(&self.borrow())
    }

    fn write(&self, f: impl FnOnce(&mut QueryState)) {
        f(&mut self.borrow_mut());
    }
}

pub struct QueryOrchestrator<W, A, S> {
    wallet: Option<W>,
    fetcher: BalanceFetcher<A>,
    store: S,
}

impl<W, A, S> QueryOrchestrator<W, A, S>
where
    W: WalletProvider,
    A: TokenApi,
    S: QueryStore,
{
    pub fn new(wallet: Option<W>, api: A, store: S) -> Self {
        Self {
            wallet,
            fetcher: BalanceFetcher::new(api),
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Drop all query-scoped state and return to `Idle`.
    ///
    /// Any query still in flight becomes stale.
    pub fn reset(&self) {
        self.store.dispatch(QueryEvent::Reset);
    }

    /// Live classification for the input field. Clearing the field resets.
    pub fn input_changed(&self, input: &str) -> InputClassification {
        let classification = classify_live(input);
        if classification == InputClassification::Empty {
            self.reset();
        }
        classification
    }

    /// Run a full query for `input`, returning its generation.
    pub async fn submit(&self, input: &str) -> u64 {
        self.store.dispatch(QueryEvent::Submitted);
        let generation = self.store.read(|state| state.generation);
        debug!("query {} submitted: {:?}", generation, input);

        let classification = classify(input);
        self.store.dispatch(QueryEvent::Classified {
            generation,
            classification: classification.clone(),
        });

        if classification.is_valid()
            && let Err(err) = self.fetcher.preflight()
        {
            self.fail(generation, err.into());
            return generation;
        }

        let Some(target) = self.resolve_target(generation, classification).await else {
            return generation;
        };

        if !self.is_current(generation) {
            debug!("query {} superseded before balance fetch", generation);
            return generation;
        }

        let entries = match self.fetcher.fetch_balances(&target).await {
            Ok(entries) => entries,
            Err(err) => {
                self.fail(generation, err.into());
                return generation;
            }
        };
        let empty = entries.is_empty();
        self.store.dispatch(QueryEvent::BalancesFetched {
            generation,
            entries: entries.clone(),
        });

        if empty || !self.is_current(generation) {
            return generation;
        }

        let metadata = self.fetcher.fetch_all_metadata(&entries).await;
        self.store
            .dispatch(QueryEvent::MetadataCollected { generation, metadata });

        if self.is_current(generation) {
            info!("query {} done: {} tokens for {}", generation, entries.len(), target);
        }
        generation
    }

    /// Turn a classification into the address to query, resolving ENS names.
    async fn resolve_target(
        &self,
        generation: u64,
        classification: InputClassification,
    ) -> Option<EthAddress> {
        match classification {
            InputClassification::Address(address) => Some(address),
            InputClassification::Ens(name) => {
                let cached = self.store.read(|state| state.cached_resolution(&name));
                let resolved = match cached {
                    Some(address) => {
                        debug!("using cached resolution for {}", name);
                        Ok(address)
                    }
                    None => ens::resolve(&name, self.wallet.as_ref()).await,
                };

                match resolved {
                    Ok(address) => {
                        self.store.dispatch(QueryEvent::NameResolved {
                            generation,
                            name,
                            address: address.clone(),
                        });
                        Some(address)
                    }
                    Err(err) => {
                        self.fail(generation, err.into());
                        None
                    }
                }
            }
            InputClassification::Invalid(_) | InputClassification::Empty => None,
        }
    }

    fn fail(&self, generation: u64, error: QueryError) {
        if self.is_current(generation) {
            info!("query {} failed ({}): {}", generation, error.kind(), error);
        }
        self.store.dispatch(QueryEvent::Failed { generation, error });
    }

    fn is_current(&self, generation: u64) -> bool {
        self.store.read(|state| state.is_current(generation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, CredentialError, ErrorKind, FetchError, ValidationError};
    use crate::mock::{MockTokenApi, MockWallet};
    use crate::models::Phase;

    const OWNER: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    type Orchestrator = QueryOrchestrator<MockWallet, MockTokenApi, Rc<RefCell<QueryState>>>;

    fn orchestrator(wallet: Option<MockWallet>, api: MockTokenApi) -> Orchestrator {
        QueryOrchestrator::new(wallet, api, Rc::new(RefCell::new(QueryState::new())))
    }

    #[tokio::test]
    async fn test_invalid_input_never_hits_network() {
        let api = MockTokenApi::new();
        let orch = orchestrator(Some(MockWallet::new()), api.clone());

        orch.submit("0x0000000000000000000000000000000000000000").await;

        let state = orch.store().snapshot();
        assert_eq!(state.phase, Phase::Failed);
        assert_eq!(
            state.error,
            Some(QueryError::Validation(ValidationError::ZeroAddress))
        );
        assert!(api.balance_calls().is_empty());
    }

    #[tokio::test]
    async fn test_blank_submit_requires_input() {
        let orch = orchestrator(None, MockTokenApi::new());
        orch.submit("   ").await;
        assert_eq!(
            orch.store().snapshot().error,
            Some(QueryError::Validation(ValidationError::Required))
        );
    }

    #[tokio::test]
    async fn test_credential_error_is_preflight() {
        let api = MockTokenApi::new().with_credential(Err(CredentialError::Invalid));
        let orch = orchestrator(Some(MockWallet::new()), api.clone());

        orch.submit(OWNER).await;

        let state = orch.store().snapshot();
        assert_eq!(state.error_kind(), Some(ErrorKind::Credential));
        assert!(api.balance_calls().is_empty());
    }

    #[tokio::test]
    async fn test_balance_failure_sets_single_error() {
        let api = MockTokenApi::new().with_balances_response(OWNER, Err(ApiError::Http(429)));
        let orch = orchestrator(None, api);

        orch.submit(OWNER).await;

        let state = orch.store().snapshot();
        assert_eq!(state.phase, Phase::Failed);
        assert_eq!(
            state.error,
            Some(QueryError::Fetch(FetchError::RateLimited))
        );
        assert_eq!(state.loading_message, None);
        assert!(state.render().tokens.is_empty());
    }

    #[tokio::test]
    async fn test_ens_without_provider_fails() {
        let orch = orchestrator(None, MockTokenApi::new());
        orch.submit("vitalik.eth").await;

        let state = orch.store().snapshot();
        assert_eq!(state.error_kind(), Some(ErrorKind::Ens));
        assert_eq!(state.loading_message, None);
    }

    #[tokio::test]
    async fn test_input_changed_clears_on_blank() {
        let orch = orchestrator(None, MockTokenApi::new());
        orch.submit(OWNER).await;
        assert_eq!(orch.store().snapshot().phase, Phase::Done);

        assert!(matches!(
            orch.input_changed("vitalik.eth"),
            InputClassification::Ens(_)
        ));
        assert_eq!(orch.store().snapshot().phase, Phase::Done);

        assert_eq!(orch.input_changed(""), InputClassification::Empty);
        assert_eq!(orch.store().snapshot().phase, Phase::Idle);
    }
}
